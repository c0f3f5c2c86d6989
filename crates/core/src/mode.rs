// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run mode selection

use std::fmt;

/// What a run does to the stack. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunMode {
    /// Create or update the stack's resources
    #[default]
    Update,
    /// Tear the stack's resources down and remove the stack
    Destroy,
}

impl RunMode {
    /// All modes in prompt order
    pub const ALL: [RunMode; 2] = [RunMode::Update, RunMode::Destroy];

    /// Name shown to the operator
    pub fn name(self) -> &'static str {
        match self {
            RunMode::Update => "update",
            RunMode::Destroy => "destroy",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
