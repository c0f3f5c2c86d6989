// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File logging
//!
//! The terminal belongs to the progress display, so logs go to a file.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;

/// Default log file: `$XDG_STATE_HOME/sitedeploy/sitedeploy.log`, falling
/// back to `~/.local/state`.
pub fn default_log_path(xdg_state_home: Option<&str>, home: Option<&str>) -> Result<PathBuf> {
    let state_dir = match (xdg_state_home, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) => PathBuf::from(home).join(".local/state"),
        _ => return Err(anyhow!("neither XDG_STATE_HOME nor HOME is set")),
    };
    Ok(state_dir.join("sitedeploy").join("sitedeploy.log"))
}

/// Resolve the log file from the configured path or the environment
pub fn log_path(configured: Option<&Path>) -> Result<PathBuf> {
    match configured {
        Some(path) => Ok(path.to_path_buf()),
        None => default_log_path(
            std::env::var("XDG_STATE_HOME").ok().as_deref(),
            std::env::var("HOME").ok().as_deref(),
        ),
    }
}

/// Install the global subscriber. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn setup_logging(log_path: &Path) -> Result<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let dir = log_path
        .parent()
        .ok_or_else(|| anyhow!("log path {} has no directory", log_path.display()))?;
    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow!("log path {} has no file name", log_path.display()))?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .context("installing log subscriber")?;

    Ok(guard)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
