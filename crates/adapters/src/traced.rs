// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::stack::{EventSender, OutputValue, StackAdapter, StackError, StackHandle, UpResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::Instrument;

/// Log the result of a stack call with its timing
fn log_result<T>(result: &Result<T, StackError>, start: Instant, done: &str) {
    let elapsed_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(_) => tracing::info!(elapsed_ms, "{}", done),
        Err(e) => tracing::error!(elapsed_ms, error = %e, "failed"),
    }
}

/// Wrapper that adds tracing to any StackAdapter
#[derive(Clone)]
pub struct TracedStackAdapter<A> {
    inner: A,
}

impl<A> TracedStackAdapter<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: StackAdapter> StackAdapter for TracedStackAdapter<A> {
    type Stack = TracedStack<A::Stack>;

    async fn create_or_select_stack(
        &self,
        project: &str,
        stack: &str,
    ) -> Result<Self::Stack, StackError> {
        let span = tracing::info_span!("stack.select", project, stack);
        async {
            tracing::info!("selecting stack");
            let start = Instant::now();
            let result = self.inner.create_or_select_stack(project, stack).await;
            log_result(&result, start, "stack selected");
            result.map(TracedStack::new)
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any StackHandle
pub struct TracedStack<S> {
    inner: S,
}

impl<S> TracedStack<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: StackHandle> StackHandle for TracedStack<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn install_plugin(&self, name: &str, version: &str) -> Result<(), StackError> {
        let span = tracing::info_span!("stack.install_plugin", plugin = name, version);
        async {
            tracing::info!("installing plugin");
            let start = Instant::now();
            let result = self.inner.install_plugin(name, version).await;
            log_result(&result, start, "plugin installed");
            result
        }
        .instrument(span)
        .await
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), StackError> {
        // Values may be credentials: log the key only
        let span = tracing::info_span!("stack.set_config", key);
        async {
            let start = Instant::now();
            let result = self.inner.set_config(key, value).await;
            log_result(&result, start, "config set");
            result
        }
        .instrument(span)
        .await
    }

    async fn refresh(&self) -> Result<(), StackError> {
        let span = tracing::info_span!("stack.refresh", stack = self.inner.name());
        async {
            tracing::info!("refreshing");
            let start = Instant::now();
            let result = self.inner.refresh().await;
            log_result(&result, start, "refresh succeeded");
            result
        }
        .instrument(span)
        .await
    }

    async fn up(&self, events: Option<EventSender>) -> Result<UpResult, StackError> {
        let span = tracing::info_span!(
            "stack.up",
            stack = self.inner.name(),
            subscribed = events.is_some()
        );
        async {
            tracing::info!("updating");
            let start = Instant::now();
            let result = self.inner.up(events).await;
            log_result(&result, start, "update succeeded");
            if let Ok(up) = &result {
                tracing::debug!(outputs = up.outputs.len(), "update outputs");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn destroy(&self) -> Result<(), StackError> {
        let span = tracing::info_span!("stack.destroy", stack = self.inner.name());
        async {
            tracing::info!("destroying");
            let start = Instant::now();
            let result = self.inner.destroy().await;
            log_result(&result, start, "stack destroyed");
            result
        }
        .instrument(span)
        .await
    }

    async fn remove_stack(&self, name: &str) -> Result<(), StackError> {
        let span = tracing::info_span!("stack.remove", stack = name);
        async {
            let start = Instant::now();
            let result = self.inner.remove_stack(name).await;
            log_result(&result, start, "stack removed");
            result
        }
        .instrument(span)
        .await
    }

    async fn outputs(&self) -> Result<BTreeMap<String, OutputValue>, StackError> {
        let result = self.inner.outputs().await;
        tracing::trace!(
            count = result.as_ref().map(|o| o.len()).ok(),
            "read outputs"
        );
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
