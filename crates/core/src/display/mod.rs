// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Display state machine and rendering
//!
//! The state is a plain value mutated by progress callbacks. Rendering is a
//! pure function of the state and the spinner frame, so the terminal layer
//! only decides where the resulting lines go.

mod render;
mod state;

pub use render::{render, Frame, Line, Marker, Spinner};
pub use state::DisplayState;
