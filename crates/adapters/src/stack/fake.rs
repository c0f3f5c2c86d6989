// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake stack adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{EventSender, OutputValue, StackAdapter, StackError, StackHandle, UpResult};
use async_trait::async_trait;
use sd_core::ResourceEvent;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Stack operation, used to pick which call should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackOp {
    CreateOrSelect,
    InstallPlugin,
    SetConfig,
    Refresh,
    Up,
    Destroy,
    RemoveStack,
    Outputs,
}

/// Recorded stack call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackCall {
    CreateOrSelect { project: String, stack: String },
    InstallPlugin { name: String, version: String },
    SetConfig { key: String, value: String },
    Refresh,
    Up { subscribed: bool },
    Destroy,
    RemoveStack { name: String },
    Outputs,
}

impl StackCall {
    pub fn op(&self) -> StackOp {
        match self {
            StackCall::CreateOrSelect { .. } => StackOp::CreateOrSelect,
            StackCall::InstallPlugin { .. } => StackOp::InstallPlugin,
            StackCall::SetConfig { .. } => StackOp::SetConfig,
            StackCall::Refresh => StackOp::Refresh,
            StackCall::Up { .. } => StackOp::Up,
            StackCall::Destroy => StackOp::Destroy,
            StackCall::RemoveStack { .. } => StackOp::RemoveStack,
            StackCall::Outputs => StackOp::Outputs,
        }
    }
}

#[derive(Default)]
struct FakeState {
    calls: Vec<StackCall>,
    failures: HashMap<StackOp, String>,
    up_events: Vec<ResourceEvent>,
    outputs: BTreeMap<String, OutputValue>,
}

/// Fake stack adapter for testing
#[derive(Clone, Default)]
pub struct FakeStackAdapter {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStackAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of `op` fail with `message`
    pub fn fail_on(self, op: StackOp, message: impl Into<String>) -> Self {
        self.lock().failures.insert(op, message.into());
        self
    }

    /// Events sent to the subscriber during `up`, in order
    pub fn with_up_events(self, events: Vec<ResourceEvent>) -> Self {
        self.lock().up_events = events;
        self
    }

    /// Stack output returned by `up` and `outputs`
    pub fn with_output(self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.lock()
            .outputs
            .insert(key.to_string(), OutputValue::new(value));
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StackCall> {
        self.lock().calls.clone()
    }

    /// Recorded operations, without arguments
    pub fn ops(&self) -> Vec<StackOp> {
        self.lock().calls.iter().map(StackCall::op).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a call and return the configured failure, if any
    fn record(&self, call: StackCall) -> Result<(), StackError> {
        let mut state = self.lock();
        let op = call.op();
        state.calls.push(call);
        match state.failures.get(&op) {
            Some(message) => Err(StackError::CommandFailed(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StackAdapter for FakeStackAdapter {
    type Stack = FakeStack;

    async fn create_or_select_stack(
        &self,
        project: &str,
        stack: &str,
    ) -> Result<FakeStack, StackError> {
        self.record(StackCall::CreateOrSelect {
            project: project.to_string(),
            stack: stack.to_string(),
        })?;
        Ok(FakeStack {
            name: stack.to_string(),
            adapter: self.clone(),
        })
    }
}

/// Stack handed out by [`FakeStackAdapter`]; shares its call log
#[derive(Clone)]
pub struct FakeStack {
    name: String,
    adapter: FakeStackAdapter,
}

#[async_trait]
impl StackHandle for FakeStack {
    fn name(&self) -> &str {
        &self.name
    }

    async fn install_plugin(&self, name: &str, version: &str) -> Result<(), StackError> {
        self.adapter.record(StackCall::InstallPlugin {
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), StackError> {
        self.adapter.record(StackCall::SetConfig {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    async fn refresh(&self) -> Result<(), StackError> {
        self.adapter.record(StackCall::Refresh)
    }

    async fn up(&self, events: Option<EventSender>) -> Result<UpResult, StackError> {
        let subscribed = events.is_some();
        let failure = self.adapter.record(StackCall::Up { subscribed });

        // Events stream out before the update reports its result
        let scripted = self.adapter.lock().up_events.clone();
        if let Some(events) = events {
            for event in scripted {
                if events.send(event).is_err() {
                    break;
                }
                tokio::task::yield_now().await;
            }
        }

        failure?;
        Ok(UpResult {
            outputs: self.adapter.lock().outputs.clone(),
        })
    }

    async fn destroy(&self) -> Result<(), StackError> {
        self.adapter.record(StackCall::Destroy)
    }

    async fn remove_stack(&self, name: &str) -> Result<(), StackError> {
        self.adapter.record(StackCall::RemoveStack {
            name: name.to_string(),
        })
    }

    async fn outputs(&self) -> Result<BTreeMap<String, OutputValue>, StackError> {
        self.adapter.record(StackCall::Outputs)?;
        Ok(self.adapter.lock().outputs.clone())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
