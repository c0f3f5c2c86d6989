// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure rendering of the display state into lines

use super::state::DisplayState;
use std::fmt;

const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Activity indicator animation position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next animation frame
    pub fn advance(&mut self) {
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn glyph(&self) -> &'static str {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }
}

/// Leading glyph of a line, styled by the terminal layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Animated activity indicator
    Spinner(&'static str),
    /// Phase that already completed
    Check,
    /// Run succeeded
    Success,
    /// Run failed
    Failure,
}

impl Marker {
    pub fn glyph(self) -> &'static str {
        match self {
            Marker::Spinner(glyph) => glyph,
            Marker::Check | Marker::Success => "✔",
            Marker::Failure => "✖",
        }
    }
}

/// A single rendered line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub marker: Option<Marker>,
    pub text: String,
}

impl Line {
    fn marked(marker: Marker, text: impl Into<String>) -> Self {
        Self {
            marker: Some(marker),
            text: text.into(),
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self {
            marker: None,
            text: text.into(),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.marker {
            Some(marker) => write!(f, "{} {}", marker.glyph(), self.text),
            None => f.write_str(&self.text),
        }
    }
}

/// Rendered display: an ordered list of lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<Line>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Render the display state.
///
/// While running: completed phases, the spinner with the current step, and
/// once resources have been seen, the in-progress and complete lists. Once
/// finished: a single success or failure line.
pub fn render(state: &DisplayState, spinner: &Spinner) -> Frame {
    if state.is_finished() {
        let line = if state.is_failed() {
            Line::marked(Marker::Failure, headline("Failure!", state.message()))
        } else {
            Line::marked(Marker::Success, headline("Success!", state.message()))
        };
        return Frame { lines: vec![line] };
    }

    let mut lines: Vec<Line> = state
        .finished_phases()
        .iter()
        .map(|label| Line::marked(Marker::Check, label.trim_end_matches("...")))
        .collect();

    let label = match state.phase_label() {
        "" => "Starting...",
        label => label,
    };
    lines.push(Line::marked(
        Marker::Spinner(spinner.glyph()),
        format!("Current step: {}", label),
    ));

    if state.has_resources() {
        lines.push(Line::plain(format!(
            "Update in progress: [{}]",
            sorted_types(state.in_flight().values())
        )));
        lines.push(Line::plain(format!(
            "Update complete: [{}]",
            sorted_types(state.completed().values())
        )));
    }

    Frame { lines }
}

fn headline(prefix: &str, message: &str) -> String {
    if message.is_empty() {
        prefix.to_string()
    } else {
        format!("{} {}", prefix, message)
    }
}

fn sorted_types<'a>(types: impl Iterator<Item = &'a String>) -> String {
    let mut types: Vec<&str> = types.map(String::as_str).collect();
    types.sort_unstable();
    types.join(", ")
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
