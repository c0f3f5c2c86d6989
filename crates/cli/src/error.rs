// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use crate::prompt::PromptError;
use sd_core::ConfigError;
use std::fmt;
use std::path::Path;
use std::process::ExitCode;

/// Exit code for errors before any phase ran
const SETUP_FAILURE: u8 = 2;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(SETUP_FAILURE)
    }

    /// The mode prompt could not run or was aborted
    pub fn prompt(err: PromptError) -> Self {
        match err {
            PromptError::NotInteractive => CliError::new(err.to_string())
                .with_context("sitedeploy asks for the run mode on an interactive terminal")
                .with_suggestion("Run sitedeploy from a terminal, not a pipe or CI job"),
            PromptError::Interrupted => CliError::new(err.to_string()),
            PromptError::Terminal(_) => CliError::new("Could not read from the terminal")
                .with_source(err),
        }
    }

    /// The configuration file could not be used
    pub fn config(path: &Path, err: ConfigError) -> Self {
        CliError::new(err.to_string())
            .with_context(format!("Loaded from {}", path.display()))
            .with_suggestion("Check the file against the documented keys")
            .with_suggestion("Remove the file to run with built-in defaults")
            .with_source(err)
    }

    /// Logging or runtime setup failed
    pub fn setup(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
