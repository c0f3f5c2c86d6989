// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress callbacks from the lifecycle driver to the display

use crate::event::ResourceEvent;
use crate::outcome::Outcome;

/// Receiver of run progress.
///
/// Calls must not block: the driver makes them inline between awaits.
pub trait ProgressSink {
    /// A phase is about to call into the provisioning engine
    fn on_phase_start(&mut self, label: &str);

    /// A resource event arrived during the apply phase
    fn on_resource_event(&mut self, event: ResourceEvent);

    /// The run is over. Called exactly once per run.
    fn on_finish(&mut self, outcome: &Outcome);
}

/// Recorded sink call
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    PhaseStart(String),
    Resource(ResourceEvent),
    Finish(Outcome),
}

/// Sink that records every call, for testing
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Vec<SinkCall>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Labels passed to `on_phase_start`, in order
    pub fn phase_labels(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::PhaseStart(label) => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Resource events, in delivery order
    pub fn resource_events(&self) -> Vec<&ResourceEvent> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Resource(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    /// Outcomes passed to `on_finish`
    pub fn outcomes(&self) -> Vec<&Outcome> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Finish(outcome) => Some(outcome),
                _ => None,
            })
            .collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl ProgressSink for RecordingSink {
    fn on_phase_start(&mut self, label: &str) {
        self.calls.push(SinkCall::PhaseStart(label.to_string()));
    }

    fn on_resource_event(&mut self, event: ResourceEvent) {
        self.calls.push(SinkCall::Resource(event));
    }

    fn on_finish(&mut self, outcome: &Outcome) {
        self.calls.push(SinkCall::Finish(outcome.clone()));
    }
}
