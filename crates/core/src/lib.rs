// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sd-core: Core library for the sitedeploy CLI
//!
//! This crate provides:
//! - The run mode and the fixed lifecycle phase sequence
//! - Resource events reported by the provisioning engine
//! - The pure display state machine and its renderer
//! - The progress callback trait shared by the driver and the display
//! - TOML configuration for the stack being deployed

pub mod config;
pub mod display;
pub mod event;
pub mod mode;
pub mod outcome;
pub mod phase;
pub mod sink;

pub use config::{ConfigError, PluginSpec, StackConfig};
pub use display::{render, DisplayState, Frame, Line, Marker, Spinner};
pub use event::ResourceEvent;
pub use mode::RunMode;
pub use outcome::Outcome;
pub use phase::Phase;
pub use sink::ProgressSink;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use sink::{RecordingSink, SinkCall};
