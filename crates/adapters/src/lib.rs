// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external provisioning engine

pub mod stack;
pub mod traced;

pub use stack::{
    EventSender, OutputValue, PulumiAdapter, PulumiStack, StackAdapter, StackError, StackHandle,
    UpResult,
};
pub use traced::{TracedStack, TracedStackAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use stack::{FakeStack, FakeStackAdapter, StackCall, StackOp};
