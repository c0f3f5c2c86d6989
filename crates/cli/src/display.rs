// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal progress display
//!
//! The driver reports progress through [`ChannelSink`]; a single render task
//! owns the [`DisplayController`] and is the only writer of the display
//! state and the terminal.

use crossterm::cursor::{Hide, MoveToPreviousLine, Show};
use crossterm::queue;
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{self, Clear, ClearType};
use sd_core::{render, DisplayState, Line, Marker, Outcome, ProgressSink, ResourceEvent, Spinner};
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Spinner animation interval
pub const TICK: Duration = Duration::from_millis(100);

/// Owns the display state and draws it.
///
/// Interactive mode redraws the whole frame in place on every change and
/// animates the spinner. Plain mode appends one line per phase and the final
/// line, for terminals that cannot move the cursor.
pub struct DisplayController<W: Write> {
    out: W,
    state: DisplayState,
    spinner: Spinner,
    interactive: bool,
    /// Fixed terminal width; queried on every draw when unset
    width: Option<u16>,
    /// Terminal rows taken by the last interactive draw, wrapping included
    drawn: usize,
}

impl<W: Write> DisplayController<W> {
    pub fn new(out: W, interactive: bool) -> Self {
        Self {
            out,
            state: DisplayState::new(),
            spinner: Spinner::new(),
            interactive,
            width: None,
            drawn: 0,
        }
    }

    #[cfg(test)]
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Advance the spinner. No-op once finished or in plain mode.
    pub fn tick(&mut self) {
        if self.state.is_finished() || !self.interactive {
            return;
        }
        self.spinner.advance();
        report(self.interactive_draw());
    }

    fn apply(&mut self, msg: DisplayMsg) {
        match msg {
            DisplayMsg::PhaseStart(label) => self.on_phase_start(&label),
            DisplayMsg::Resource(event) => self.on_resource_event(event),
            DisplayMsg::Finish(outcome) => self.on_finish(&outcome),
        }
    }

    /// Draw the state after a change
    fn refresh(&mut self) {
        let result = if self.interactive {
            self.interactive_draw()
        } else {
            self.plain_draw()
        };
        report(result);
    }

    fn interactive_draw(&mut self) -> io::Result<()> {
        let frame = render(&self.state, &self.spinner);

        if self.drawn == 0 {
            queue!(self.out, Hide)?;
        } else {
            let up = u16::try_from(self.drawn).unwrap_or(u16::MAX);
            queue!(self.out, MoveToPreviousLine(up))?;
        }
        queue!(self.out, Clear(ClearType::FromCursorDown))?;

        for line in &frame.lines {
            write_line(&mut self.out, line)?;
        }
        if self.state.is_finished() {
            queue!(self.out, Show)?;
        }

        let width = self
            .width
            .or_else(|| terminal::size().ok().map(|(cols, _)| cols));
        self.drawn = frame.lines.iter().map(|line| rows(line, width)).sum();
        self.out.flush()
    }

    /// Give the cursor back when the run ends without a final frame
    pub fn release(&mut self) {
        if !self.interactive || self.drawn == 0 || self.state.is_finished() {
            return;
        }
        report(queue!(self.out, Show).and_then(|()| self.out.flush()));
    }

    /// Append the newest line: the current phase, or the final line
    fn plain_draw(&mut self) -> io::Result<()> {
        if self.state.is_finished() {
            let frame = render(&self.state, &self.spinner);
            for line in &frame.lines {
                writeln!(self.out, "{}", line)?;
            }
        } else {
            writeln!(self.out, "{}", self.state.phase_label())?;
        }
        self.out.flush()
    }
}

/// Drawing errors are logged; progress keeps flowing
fn report(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "failed to draw progress");
    }
}

/// Terminal rows a line occupies once wrapped at `width`
fn rows(line: &Line, width: Option<u16>) -> usize {
    let chars = line.to_string().chars().count();
    match width {
        Some(width) if width > 0 => chars.div_ceil(usize::from(width)).max(1),
        _ => 1,
    }
}

fn write_line<W: Write>(out: &mut W, line: &Line) -> io::Result<()> {
    match line.marker {
        Some(Marker::Success) => {
            queue!(out, PrintStyledContent(line.to_string().green().bold()))?;
        }
        Some(Marker::Failure) => {
            queue!(out, PrintStyledContent(line.to_string().red().bold()))?;
        }
        Some(Marker::Check) => {
            queue!(
                out,
                PrintStyledContent(Marker::Check.glyph().green()),
                Print(format!(" {}", line.text)),
            )?;
        }
        Some(marker @ Marker::Spinner(_)) => {
            queue!(
                out,
                PrintStyledContent(marker.glyph().cyan()),
                Print(format!(" {}", line.text)),
            )?;
        }
        None => queue!(out, Print(&line.text))?,
    }
    queue!(out, Print("\n"))
}

impl<W: Write> ProgressSink for DisplayController<W> {
    fn on_phase_start(&mut self, label: &str) {
        if self.state.start_phase(label) {
            self.refresh();
        }
    }

    fn on_resource_event(&mut self, event: ResourceEvent) {
        if self.state.apply_event(event) && self.interactive {
            self.refresh();
        }
    }

    fn on_finish(&mut self, outcome: &Outcome) {
        if self.state.finish(outcome) {
            self.refresh();
        }
    }
}

/// Progress message from the driver to the render task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayMsg {
    PhaseStart(String),
    Resource(ResourceEvent),
    Finish(Outcome),
}

/// Sink that forwards progress to the render task without blocking
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<DisplayMsg>,
}

impl ChannelSink {
    fn send(&self, msg: DisplayMsg) {
        if self.tx.send(msg).is_err() {
            tracing::debug!("display task gone, dropping progress");
        }
    }
}

impl ProgressSink for ChannelSink {
    fn on_phase_start(&mut self, label: &str) {
        self.send(DisplayMsg::PhaseStart(label.to_string()));
    }

    fn on_resource_event(&mut self, event: ResourceEvent) {
        self.send(DisplayMsg::Resource(event));
    }

    fn on_finish(&mut self, outcome: &Outcome) {
        self.send(DisplayMsg::Finish(outcome.clone()));
    }
}

pub fn channel() -> (ChannelSink, mpsc::UnboundedReceiver<DisplayMsg>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSink { tx }, rx)
}

/// Render task: apply progress messages and animate the spinner until the
/// run finishes or every sink is dropped. Returns the controller with the
/// cursor visible again.
pub async fn run_display<W: Write>(
    mut display: DisplayController<W>,
    mut rx: mpsc::UnboundedReceiver<DisplayMsg>,
) -> DisplayController<W> {
    let mut ticker = tokio::time::interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(msg) => {
                    display.apply(msg);
                    if display.state().is_finished() {
                        break;
                    }
                }
                None => break,
            },
            _ = ticker.tick() => display.tick(),
        }
    }

    display.release();
    display
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
