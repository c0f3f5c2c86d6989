// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle driver
//!
//! Runs the fixed phase sequence against a stack adapter, reporting each
//! transition to a progress sink. The first failing phase ends the run; there
//! is no retry and no rollback.

use crate::error::PhaseError;
use sd_adapters::{StackAdapter, StackHandle, UpResult};
use sd_core::{Outcome, Phase, PluginSpec, ProgressSink, RunMode, StackConfig};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::Instrument;

/// What the driver needs to know about the stack
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub project: String,
    pub stack: String,
    pub plugin: PluginSpec,
    /// Applied in key order during the configuration phase
    pub config: BTreeMap<String, String>,
    /// Stack output holding the website endpoint
    pub output_key: String,
}

impl From<&StackConfig> for RunSettings {
    fn from(config: &StackConfig) -> Self {
        Self {
            project: config.project.clone(),
            stack: config.stack.clone(),
            plugin: config.plugin.clone(),
            config: config.config.clone(),
            output_key: config.output.clone(),
        }
    }
}

/// Drives one run of the stack lifecycle
pub struct Driver<A> {
    adapter: A,
    settings: RunSettings,
}

impl<A: StackAdapter> Driver<A> {
    pub fn new(adapter: A, settings: RunSettings) -> Self {
        Self { adapter, settings }
    }

    /// Run every phase for `mode`, reporting progress to `sink`.
    ///
    /// Always reports exactly one outcome through `sink.on_finish` and
    /// returns the same outcome.
    pub async fn run<S: ProgressSink>(&self, mode: RunMode, sink: &mut S) -> Outcome {
        let span = tracing::info_span!("run", %mode, stack = %self.settings.stack);
        let result = self.run_phases(mode, sink).instrument(span.clone()).await;

        let outcome = span.in_scope(|| match result {
            Ok(message) => {
                tracing::info!(%message, "run succeeded");
                Outcome::success(message)
            }
            Err(e) => {
                tracing::error!(phase = %e.phase(), error = %e, "run failed");
                Outcome::failure(e.to_string())
            }
        });

        sink.on_finish(&outcome);
        outcome
    }

    async fn run_phases<S: ProgressSink>(
        &self,
        mode: RunMode,
        sink: &mut S,
    ) -> Result<String, PhaseError> {
        let settings = &self.settings;

        enter(Phase::CreatingStack, mode, sink);
        let stack = self
            .adapter
            .create_or_select_stack(&settings.project, &settings.stack)
            .await
            .map_err(PhaseError::stack(Phase::CreatingStack))?;
        tracing::info!("stack ready");

        enter(Phase::EnsuringPlugins, mode, sink);
        stack
            .install_plugin(&settings.plugin.name, &settings.plugin.version)
            .await
            .map_err(PhaseError::stack(Phase::EnsuringPlugins))?;
        tracing::info!(plugin = %settings.plugin.name, "installed plugin");

        enter(Phase::SettingConfig, mode, sink);
        for (key, value) in &settings.config {
            stack
                .set_config(key, value)
                .await
                .map_err(PhaseError::stack(Phase::SettingConfig))?;
        }
        tracing::info!(entries = settings.config.len(), "configuration set");

        enter(Phase::Refreshing, mode, sink);
        stack
            .refresh()
            .await
            .map_err(PhaseError::stack(Phase::Refreshing))?;
        tracing::info!("refresh succeeded");

        enter(Phase::Applying, mode, sink);
        match mode {
            RunMode::Update => {
                let result = apply_update(&stack, sink).await?;
                tracing::info!("update succeeded");
                let url = website_url(&result, &settings.output_key)?;
                Ok(format!("Website URL: {}", url))
            }
            RunMode::Destroy => {
                stack
                    .destroy()
                    .await
                    .map_err(PhaseError::stack(Phase::Applying))?;
                tracing::info!("destroy succeeded");

                enter(Phase::DeletingStack, mode, sink);
                let name = stack.name().to_string();
                stack
                    .remove_stack(&name)
                    .await
                    .map_err(PhaseError::stack(Phase::DeletingStack))?;
                tracing::info!(stack = %name, "stack removed");
                Ok("Stack destroyed".to_string())
            }
        }
    }
}

/// Announce a phase to the sink before its engine call
fn enter<S: ProgressSink>(phase: Phase, mode: RunMode, sink: &mut S) {
    let label = phase.label(mode);
    tracing::info!(%phase, "{}", label);
    sink.on_phase_start(label);
}

/// Run the update, forwarding resource events to the sink as they arrive
async fn apply_update<H: StackHandle, S: ProgressSink>(
    stack: &H,
    sink: &mut S,
) -> Result<UpResult, PhaseError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut up = stack.up(Some(tx));

    let result = loop {
        tokio::select! {
            biased;
            Some(event) = rx.recv() => sink.on_resource_event(event),
            result = &mut up => break result,
        }
    };

    // Events sent just before the update returned
    while let Ok(event) = rx.try_recv() {
        sink.on_resource_event(event);
    }

    result.map_err(PhaseError::stack(Phase::Applying))
}

/// Pull the website endpoint out of the update's outputs
fn website_url(result: &UpResult, key: &str) -> Result<String, PhaseError> {
    let endpoint = result
        .outputs
        .get(key)
        .ok_or_else(|| PhaseError::MissingOutput {
            key: key.to_string(),
        })?
        .as_str()
        .ok_or_else(|| PhaseError::InvalidOutput {
            key: key.to_string(),
        })?;

    if endpoint.contains("://") {
        Ok(endpoint.to_string())
    } else {
        Ok(format!("http://{}", endpoint))
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
