// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive run mode selection

use crossterm::cursor::{Hide, MoveToPreviousLine, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::{execute, queue};
use sd_core::RunMode;
use std::io::{self, IsTerminal, Write};
use thiserror::Error;

pub const QUESTION: &str = "What kind of update is this?";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt couldn't be rendered in the current environment.")]
    NotInteractive,
    #[error("Prompt was aborted")]
    Interrupted,
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// Result of handling a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Keep asking
    Continue,
    /// The operator confirmed a mode
    Select(RunMode),
    /// The operator gave up
    Abort,
}

/// Cursor over the run mode choices
#[derive(Debug, Clone, Default)]
pub struct Selector {
    cursor: usize,
}

impl Selector {
    /// Start on the default mode
    pub fn new() -> Self {
        let cursor = RunMode::ALL
            .iter()
            .position(|mode| *mode == RunMode::default())
            .unwrap_or(0);
        Self { cursor }
    }

    pub fn selected(&self) -> RunMode {
        RunMode::ALL[self.cursor]
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult {
        let count = RunMode::ALL.len();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyResult::Abort
            }
            KeyCode::Esc => KeyResult::Abort,
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = (self.cursor + count - 1) % count;
                KeyResult::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1) % count;
                KeyResult::Continue
            }
            KeyCode::Enter => KeyResult::Select(self.selected()),
            _ => KeyResult::Continue,
        }
    }

    /// Choice lines, the highlighted one marked with `>`
    pub fn lines(&self) -> Vec<String> {
        RunMode::ALL
            .iter()
            .enumerate()
            .map(|(i, mode)| {
                let pointer = if i == self.cursor { ">" } else { " " };
                format!("{} {}", pointer, mode)
            })
            .collect()
    }
}

/// Raw mode for the lifetime of the prompt; restores the terminal on drop
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show);
        let _ = disable_raw_mode();
    }
}

/// Ask which kind of run this is.
///
/// Fails with [`PromptError::NotInteractive`] before touching the terminal
/// when stdin or stdout is not a terminal. Blocks on key input.
pub fn select_mode() -> Result<RunMode, PromptError> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(PromptError::NotInteractive);
    }

    let mut stdout = io::stdout();
    let _guard = RawModeGuard::enable()?;
    let mut selector = Selector::new();
    draw(&mut stdout, &selector, false)?;

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match selector.handle_key(key) {
            KeyResult::Continue => draw(&mut stdout, &selector, true)?,
            KeyResult::Select(mode) => {
                answer(&mut stdout, Some(mode))?;
                return Ok(mode);
            }
            KeyResult::Abort => {
                answer(&mut stdout, None)?;
                return Err(PromptError::Interrupted);
            }
        }
    }
}

/// Draw the question and choices; `redraw` replaces the previous drawing
fn draw<W: Write>(out: &mut W, selector: &Selector, redraw: bool) -> io::Result<()> {
    let lines = selector.lines();
    if redraw {
        queue!(out, MoveToPreviousLine(lines.len() as u16 + 1))?;
    }
    queue!(
        out,
        Clear(ClearType::FromCursorDown),
        PrintStyledContent("?".green()),
        Print(format!(" {}\r\n", QUESTION)),
    )?;
    for line in lines {
        if line.starts_with('>') {
            queue!(out, PrintStyledContent(line.cyan()), Print("\r\n"))?;
        } else {
            queue!(out, Print(line), Print("\r\n"))?;
        }
    }
    out.flush()
}

/// Collapse the prompt into a single answered line
fn answer<W: Write>(out: &mut W, mode: Option<RunMode>) -> io::Result<()> {
    let height = RunMode::ALL.len() as u16 + 1;
    queue!(
        out,
        MoveToPreviousLine(height),
        Clear(ClearType::FromCursorDown),
        PrintStyledContent("?".green()),
        Print(format!(" {} ", QUESTION)),
    )?;
    if let Some(mode) = mode {
        queue!(out, PrintStyledContent(mode.name().cyan()))?;
    }
    queue!(out, Print("\r\n"))?;
    out.flush()
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
