// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle phase definitions
//!
//! A run visits phases in a fixed total order. The only branch is at the end:
//! a destroy run removes the stack after applying, an update run does not.

use crate::mode::RunMode;
use std::fmt;

/// One step of the run lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Create the stack or select the existing one
    CreatingStack,
    /// Install the provider plugin
    EnsuringPlugins,
    /// Write stack configuration
    SettingConfig,
    /// Reconcile state with the cloud
    Refreshing,
    /// Run the update or the destroy
    Applying,
    /// Remove the emptied stack (destroy only)
    DeletingStack,
    /// Run succeeded
    Done,
    /// Run stopped on an error
    Failed,
}

const UPDATE_SEQUENCE: [Phase; 5] = [
    Phase::CreatingStack,
    Phase::EnsuringPlugins,
    Phase::SettingConfig,
    Phase::Refreshing,
    Phase::Applying,
];

const DESTROY_SEQUENCE: [Phase; 6] = [
    Phase::CreatingStack,
    Phase::EnsuringPlugins,
    Phase::SettingConfig,
    Phase::Refreshing,
    Phase::Applying,
    Phase::DeletingStack,
];

impl Phase {
    /// Working phases for a mode, in the order they run. Excludes the
    /// terminal phases.
    pub fn sequence(mode: RunMode) -> &'static [Phase] {
        match mode {
            RunMode::Update => &UPDATE_SEQUENCE,
            RunMode::Destroy => &DESTROY_SEQUENCE,
        }
    }

    /// Progress label shown while the phase runs
    pub fn label(self, mode: RunMode) -> &'static str {
        match (self, mode) {
            (Phase::CreatingStack, _) => "Creating stack...",
            (Phase::EnsuringPlugins, _) => "Ensuring plugins...",
            (Phase::SettingConfig, _) => "Setting configuration...",
            (Phase::Refreshing, _) => "Running refresh...",
            (Phase::Applying, RunMode::Update) => "Running update...",
            (Phase::Applying, RunMode::Destroy) => "Running destroy...",
            (Phase::DeletingStack, _) => "Deleting stack...",
            (Phase::Done, _) => "Success!",
            (Phase::Failed, _) => "Failure!",
        }
    }

    /// Whether the run is over once this phase is reached
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }

    /// Stable name used in logs
    pub fn name(self) -> &'static str {
        match self {
            Phase::CreatingStack => "creating_stack",
            Phase::EnsuringPlugins => "ensuring_plugins",
            Phase::SettingConfig => "setting_config",
            Phase::Refreshing => "refreshing",
            Phase::Applying => "applying",
            Phase::DeletingStack => "deleting_stack",
            Phase::Done => "done",
            Phase::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
