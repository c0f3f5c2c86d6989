// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sitedeploy - provision or tear down a static website stack

mod display;
mod error;
mod logging;
mod prompt;

use clap::Parser;
use display::DisplayController;
use error::CliError;
use sd_adapters::{PulumiAdapter, TracedStackAdapter};
use sd_core::{Outcome, ProgressSink, RunMode, StackConfig};
use sd_engine::{Driver, RunSettings};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Configuration file picked up from the working directory
const DEFAULT_CONFIG: &str = "sitedeploy.toml";

/// Exit code for a run that reached the engine and failed
const RUN_FAILURE: u8 = 1;

/// Failure message when the operator stops a run
const INTERRUPTED: &str = "Interrupted";

#[derive(Parser)]
#[command(
    name = "sitedeploy",
    version,
    about = "Provision or tear down a static website stack with Pulumi"
)]
struct Cli {
    /// Configuration file [default: ./sitedeploy.toml when present]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprint!("{}", e);
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = load_config(cli.config.as_deref())?;

    let log_path = logging::log_path(config.log_file.as_deref()).map_err(CliError::setup)?;
    // Dropped last: flushes every line below, including the stop error
    let _log_guard = logging::setup_logging(&log_path).map_err(CliError::setup)?;
    tracing::info!(
        project = %config.project,
        stack = %config.stack,
        work_dir = %config.work_dir.display(),
        "sitedeploy starting"
    );

    let result = run_logged(&config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e.message, "sitedeploy stopped");
    }
    result
}

/// Everything after logging is up
async fn run_logged(config: &StackConfig) -> Result<ExitCode, CliError> {
    let mode = ask_mode().await?;
    tracing::info!(%mode, "mode selected");

    let outcome = deploy(config, mode).await;
    if outcome.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(RUN_FAILURE))
    }
}

/// Explicit path must exist; the default file is optional
fn load_config(explicit: Option<&Path>) -> Result<StackConfig, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if !default.is_file() {
                return Ok(StackConfig::default());
            }
            default
        }
    };
    StackConfig::load(&path).map_err(|e| CliError::config(&path, e))
}

/// The prompt blocks on terminal input, so it runs off the async workers
async fn ask_mode() -> Result<RunMode, CliError> {
    match tokio::task::spawn_blocking(prompt::select_mode).await {
        Ok(result) => result.map_err(CliError::prompt),
        Err(e) => Err(CliError::new("Prompt task failed").with_source(e)),
    }
}

/// Ctrl-C during a run drops the driver and ends with a failure line
async fn deploy(config: &StackConfig, mode: RunMode) -> Outcome {
    let stdout = io::stdout();
    let interactive = stdout.is_terminal() && !dumb_terminal();
    let (mut sink, rx) = display::channel();
    let render = tokio::spawn(display::run_display(
        DisplayController::new(stdout, interactive),
        rx,
    ));

    let adapter = TracedStackAdapter::new(PulumiAdapter::new(
        config.pulumi.clone(),
        config.work_dir.clone(),
    ));
    let driver = Driver::new(adapter, RunSettings::from(config));
    let outcome = tokio::select! {
        outcome = driver.run(mode, &mut sink) => outcome,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted, abandoning the run");
            let outcome = Outcome::failure(INTERRUPTED);
            sink.on_finish(&outcome);
            outcome
        }
    };

    drop(sink);
    if let Err(e) = render.await {
        tracing::error!(error = %e, "display task failed");
    }
    outcome
}

fn dumb_terminal() -> bool {
    std::env::var("TERM").is_ok_and(|term| term == "dumb")
}
