// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Display state machine

use crate::event::ResourceEvent;
use crate::outcome::Outcome;
use std::collections::BTreeMap;

/// What the progress display knows about the run.
///
/// Invariants:
/// - a urn in `completed` is never in `in_flight`
/// - once `finished` is set nothing changes again
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    phase_label: String,
    finished_phases: Vec<String>,
    finished: bool,
    failed: bool,
    message: String,
    in_flight: BTreeMap<String, String>,
    completed: BTreeMap<String, String>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new phase. The resource maps survive phase changes.
    ///
    /// Returns whether the state changed.
    pub fn start_phase(&mut self, label: &str) -> bool {
        if self.finished {
            return false;
        }
        let previous = std::mem::replace(&mut self.phase_label, label.to_string());
        if !previous.is_empty() {
            self.finished_phases.push(previous);
        }
        true
    }

    /// Track a resource event.
    ///
    /// Returns whether the state changed.
    pub fn apply_event(&mut self, event: ResourceEvent) -> bool {
        if self.finished {
            return false;
        }
        match event {
            ResourceEvent::Pre { urn, resource_type } => {
                // A urn the engine touches again is back in flight
                self.completed.remove(&urn);
                self.in_flight.insert(urn, resource_type);
            }
            ResourceEvent::Outputs { urn, resource_type } => {
                self.in_flight.remove(&urn);
                self.completed.insert(urn, resource_type);
            }
        }
        true
    }

    /// Record the run's outcome. Only the first call has any effect.
    ///
    /// Returns whether the state changed.
    pub fn finish(&mut self, outcome: &Outcome) -> bool {
        if self.finished {
            return false;
        }
        self.finished = true;
        self.failed = !outcome.is_success();
        self.message = outcome.message().to_string();
        true
    }

    /// Label of the phase currently running (empty before the first phase)
    pub fn phase_label(&self) -> &str {
        &self.phase_label
    }

    /// Labels of phases already left behind, oldest first
    pub fn finished_phases(&self) -> &[String] {
        &self.finished_phases
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Outcome message, empty until finished
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Resources with a pre event but no outputs event yet, keyed by urn
    pub fn in_flight(&self) -> &BTreeMap<String, String> {
        &self.in_flight
    }

    /// Resources the engine has finished, keyed by urn
    pub fn completed(&self) -> &BTreeMap<String, String> {
        &self.completed
    }

    /// Whether any resource event has been seen
    pub fn has_resources(&self) -> bool {
        !self.in_flight.is_empty() || !self.completed.is_empty()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
