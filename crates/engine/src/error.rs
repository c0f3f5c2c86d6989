// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the lifecycle driver

use sd_adapters::StackError;
use sd_core::Phase;
use thiserror::Error;

/// A phase failed; the run stops here.
///
/// The display message is exactly what the operator sees after the failure
/// marker, so stack errors pass through unchanged.
#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("{source}")]
    Stack {
        phase: Phase,
        #[source]
        source: StackError,
    },
    #[error("stack output `{key}` not found")]
    MissingOutput { key: String },
    #[error("stack output `{key}` is not a string")]
    InvalidOutput { key: String },
}

impl PhaseError {
    pub fn stack(phase: Phase) -> impl FnOnce(StackError) -> PhaseError {
        move |source| PhaseError::Stack { phase, source }
    }

    /// Phase the run failed in
    pub fn phase(&self) -> Phase {
        match self {
            PhaseError::Stack { phase, .. } => *phase,
            PhaseError::MissingOutput { .. } | PhaseError::InvalidOutput { .. } => Phase::Applying,
        }
    }
}
