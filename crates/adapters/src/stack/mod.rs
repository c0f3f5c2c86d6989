// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stack provisioning adapters

mod event_log;
mod pulumi;

pub use pulumi::{PulumiAdapter, PulumiStack};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStack, FakeStackAdapter, StackCall, StackOp};

use async_trait::async_trait;
use sd_core::ResourceEvent;
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::mpsc;

/// Channel the engine pushes resource events into while an update runs
pub type EventSender = mpsc::UnboundedSender<ResourceEvent>;

/// Errors from stack operations
#[derive(Debug, Error)]
pub enum StackError {
    #[error("failed to run {program}: {message}")]
    Spawn { program: String, message: String },
    /// The engine rejected the operation; the message is the engine's own
    #[error("{0}")]
    CommandFailed(String),
    #[error("unreadable engine output: {0}")]
    InvalidOutput(String),
    /// The project directory belongs to a different Pulumi project
    #[error("{path} names project '{found}', expected '{expected}'")]
    ProjectMismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error("cannot read {path}: {message}")]
    ProjectFile { path: String, message: String },
}

/// A single stack output
#[derive(Debug, Clone, PartialEq)]
pub struct OutputValue {
    pub value: serde_json::Value,
}

impl OutputValue {
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// Result of a successful update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpResult {
    pub outputs: BTreeMap<String, OutputValue>,
}

/// Adapter for creating or selecting stacks
#[async_trait]
pub trait StackAdapter: Clone + Send + Sync + 'static {
    type Stack: StackHandle;

    /// Create the stack if it does not exist, otherwise select it
    async fn create_or_select_stack(
        &self,
        project: &str,
        stack: &str,
    ) -> Result<Self::Stack, StackError>;
}

/// Operations on a selected stack
#[async_trait]
pub trait StackHandle: Send + Sync + 'static {
    /// Stack name
    fn name(&self) -> &str;

    /// Install a provider plugin
    async fn install_plugin(&self, name: &str, version: &str) -> Result<(), StackError>;

    /// Set a stack configuration value
    async fn set_config(&self, key: &str, value: &str) -> Result<(), StackError>;

    /// Reconcile the stack's state with the cloud
    async fn refresh(&self) -> Result<(), StackError>;

    /// Create or update resources.
    ///
    /// When `events` is given, resource events are sent on it as the engine
    /// reports them, before this call returns.
    async fn up(&self, events: Option<EventSender>) -> Result<UpResult, StackError>;

    /// Delete all of the stack's resources
    async fn destroy(&self) -> Result<(), StackError>;

    /// Remove a stack and its configuration
    async fn remove_stack(&self, name: &str) -> Result<(), StackError>;

    /// Current stack outputs
    async fn outputs(&self) -> Result<BTreeMap<String, OutputValue>, StackError>;
}
