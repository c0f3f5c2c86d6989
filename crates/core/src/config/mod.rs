// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stack configuration
//!
//! Loaded from a TOML file. Every field has a default matching the static
//! website demo stack, so an empty file (or no file) is valid.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Provider plugin installed before configuring the stack
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginSpec {
    pub name: String,
    pub version: String,
}

impl Default for PluginSpec {
    fn default() -> Self {
        Self {
            name: "aws".to_string(),
            version: "v3.38.1".to_string(),
        }
    }
}

/// Everything needed to locate and drive the stack
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackConfig {
    /// Pulumi project name
    pub project: String,
    /// Stack name within the project
    pub stack: String,
    /// Directory holding the Pulumi project
    pub work_dir: PathBuf,
    /// Pulumi CLI binary
    pub pulumi: PathBuf,
    /// Stack output holding the website endpoint
    pub output: String,
    /// Log file; defaults to the state directory
    pub log_file: Option<PathBuf>,
    pub plugin: PluginSpec,
    /// Stack configuration values, applied in key order
    pub config: BTreeMap<String, String>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            project: "inlineNode".to_string(),
            stack: "dev".to_string(),
            work_dir: PathBuf::from("."),
            pulumi: PathBuf::from("pulumi"),
            output: "websiteUrl".to_string(),
            log_file: None,
            plugin: PluginSpec::default(),
            config: BTreeMap::from([("aws:region".to_string(), "us-west-2".to_string())]),
        }
    }
}

impl StackConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("<inline>"))
    }

    /// Load configuration from a file. Relative `work_dir` and `log_file`
    /// paths are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let mut config = Self::parse(&content, path)?;

        if let Some(base) = path.parent() {
            if config.work_dir.is_relative() {
                config.work_dir = base.join(&config.work_dir);
            }
            if let Some(log_file) = config.log_file.as_mut().filter(|p| p.is_relative()) {
                *log_file = base.join(&*log_file);
            }
        }

        Ok(config)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: StackConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.project.trim().is_empty() {
            return Err(ConfigError::Invalid("project must not be empty".to_string()));
        }
        if self.stack.trim().is_empty() {
            return Err(ConfigError::Invalid("stack must not be empty".to_string()));
        }
        if self.output.trim().is_empty() {
            return Err(ConfigError::Invalid("output must not be empty".to_string()));
        }
        if self.plugin.name.trim().is_empty() || self.plugin.version.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "plugin name and version must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
