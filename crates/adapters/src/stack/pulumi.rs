// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pulumi CLI stack adapter

use super::event_log;
use super::{EventSender, OutputValue, StackAdapter, StackError, StackHandle, UpResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tokio::sync::oneshot;

/// Stack adapter driving the `pulumi` command line
#[derive(Debug, Clone)]
pub struct PulumiAdapter {
    program: PathBuf,
    work_dir: PathBuf,
}

/// Project file pulumi reads from the working directory
const PROJECT_FILE: &str = "Pulumi.yaml";

impl PulumiAdapter {
    /// `program` is the pulumi binary, `work_dir` the project directory
    pub fn new(program: PathBuf, work_dir: PathBuf) -> Self {
        Self { program, work_dir }
    }

    /// Refuse a project file that names another project. A missing file is
    /// left for pulumi to report.
    async fn check_project(&self, project: &str) -> Result<(), StackError> {
        let path = self.work_dir.join(PROJECT_FILE);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(StackError::ProjectFile {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        match project_name(&content) {
            Some(found) if found != project => Err(StackError::ProjectMismatch {
                path: path.display().to_string(),
                expected: project.to_string(),
                found,
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl StackAdapter for PulumiAdapter {
    type Stack = PulumiStack;

    async fn create_or_select_stack(
        &self,
        project: &str,
        stack: &str,
    ) -> Result<PulumiStack, StackError> {
        self.check_project(project).await?;

        let handle = PulumiStack {
            program: self.program.clone(),
            work_dir: self.work_dir.clone(),
            stack: stack.to_string(),
        };
        handle
            .run(&["stack", "select", "--create", stack, "--non-interactive"])
            .await?;
        Ok(handle)
    }
}

/// A stack selected through the `pulumi` command line
#[derive(Debug, Clone)]
pub struct PulumiStack {
    program: PathBuf,
    work_dir: PathBuf,
    stack: String,
}

impl PulumiStack {
    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(&self.work_dir)
            .args(args)
            .env("PULUMI_SKIP_UPDATE_CHECKS", "true")
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    /// Run to completion, returning stdout on success
    async fn run(&self, args: &[&str]) -> Result<String, StackError> {
        let output = self
            .command(args)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;
        check(output)
    }

    fn spawn_error(&self, e: std::io::Error) -> StackError {
        StackError::Spawn {
            program: self.program.display().to_string(),
            message: e.to_string(),
        }
    }

    /// Run `up` while following its engine event log
    async fn up_with_events(
        &self,
        args: &[&str],
        events: EventSender,
    ) -> Result<String, StackError> {
        let log_dir = tempfile::Builder::new()
            .prefix("sitedeploy-events")
            .tempdir()
            .map_err(|e| StackError::InvalidOutput(format!("event log directory: {}", e)))?;
        let log_path = log_dir.path().join("events.jsonl");

        let mut cmd = self.command(args);
        cmd.arg("--event-log")
            .arg(&log_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let child = cmd.spawn().map_err(|e| self.spawn_error(e))?;

        let (stop_tx, stop_rx) = oneshot::channel();
        let follower = tokio::spawn(event_log::follow(log_path, events, stop_rx));

        let output = child.wait_with_output().await;
        let _ = stop_tx.send(());

        match follower.await {
            Ok(Ok(count)) => tracing::debug!(count, "engine events forwarded"),
            Ok(Err(e)) => tracing::warn!(error = %e, "event log read failed"),
            Err(e) => tracing::warn!(error = %e, "event log follower panicked"),
        }

        check(output.map_err(|e| self.spawn_error(e))?)
    }
}

#[async_trait]
impl StackHandle for PulumiStack {
    fn name(&self) -> &str {
        &self.stack
    }

    async fn install_plugin(&self, name: &str, version: &str) -> Result<(), StackError> {
        self.run(&["plugin", "install", "resource", name, version])
            .await?;
        Ok(())
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), StackError> {
        self.run(&["config", "set", key, value, "--stack", &self.stack])
            .await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<(), StackError> {
        self.run(&[
            "refresh",
            "--yes",
            "--skip-preview",
            "--non-interactive",
            "--stack",
            &self.stack,
        ])
        .await?;
        Ok(())
    }

    async fn up(&self, events: Option<EventSender>) -> Result<UpResult, StackError> {
        let args = [
            "up",
            "--yes",
            "--skip-preview",
            "--non-interactive",
            "--stack",
            self.stack.as_str(),
        ];
        match events {
            Some(events) => self.up_with_events(&args, events).await?,
            None => self.run(&args).await?,
        };

        Ok(UpResult {
            outputs: self.outputs().await?,
        })
    }

    async fn destroy(&self) -> Result<(), StackError> {
        self.run(&[
            "destroy",
            "--yes",
            "--skip-preview",
            "--non-interactive",
            "--stack",
            &self.stack,
        ])
        .await?;
        Ok(())
    }

    async fn remove_stack(&self, name: &str) -> Result<(), StackError> {
        self.run(&["stack", "rm", "--yes", name]).await?;
        Ok(())
    }

    async fn outputs(&self) -> Result<BTreeMap<String, OutputValue>, StackError> {
        let stdout = self
            .run(&["stack", "output", "--json", "--stack", &self.stack])
            .await?;
        parse_outputs(&stdout)
    }
}

/// Map a finished command to its stdout or the engine's error message
fn check(output: Output) -> Result<String, StackError> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let message = failure_message(&stderr)
        .or_else(|| failure_message(&stdout))
        .unwrap_or_else(|| match output.status.code() {
            Some(code) => format!("pulumi exited with status {}", code),
            None => "pulumi was terminated by a signal".to_string(),
        });
    Err(StackError::CommandFailed(message))
}

/// Pick the most useful line out of pulumi's output: the last `error:` line,
/// or failing that the last non-empty line.
pub(crate) fn failure_message(text: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find_map(|l| l.strip_prefix("error:").map(str::trim))
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .or_else(|| lines.last().map(|l| l.to_string()))
}

/// Top-level `name` of a Pulumi project file
pub(crate) fn project_name(yaml: &str) -> Option<String> {
    yaml.lines()
        .find_map(|line| line.strip_prefix("name:"))
        .map(|value| {
            value
                .split(" #")
                .next()
                .unwrap_or_default()
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .to_string()
        })
        .filter(|name| !name.is_empty())
}

/// Parse `pulumi stack output --json`
pub(crate) fn parse_outputs(stdout: &str) -> Result<BTreeMap<String, OutputValue>, StackError> {
    if stdout.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let raw: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(stdout).map_err(|e| StackError::InvalidOutput(e.to_string()))?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, OutputValue::new(v)))
        .collect())
}

#[cfg(test)]
#[path = "pulumi_tests.rs"]
mod tests;
