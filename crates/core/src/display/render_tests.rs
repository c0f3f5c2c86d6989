// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{Outcome, ResourceEvent};
use similar_asserts::assert_eq;

fn running_update() -> DisplayState {
    let mut state = DisplayState::new();
    for label in [
        "Creating stack...",
        "Ensuring plugins...",
        "Setting configuration...",
        "Running refresh...",
        "Running update...",
    ] {
        state.start_phase(label);
    }
    state
}

#[test]
fn renders_starting_before_first_phase() {
    let frame = render(&DisplayState::new(), &Spinner::new());

    assert_eq!(frame.to_string(), "⣾ Current step: Starting...\n");
}

#[test]
fn renders_checklist_and_current_step() {
    let frame = render(&running_update(), &Spinner::new());

    assert_eq!(
        frame.to_string(),
        "\
✔ Creating stack
✔ Ensuring plugins
✔ Setting configuration
✔ Running refresh
⣾ Current step: Running update...
"
    );
}

#[test]
fn renders_resource_lists_sorted_by_type() {
    let mut state = running_update();
    state.apply_event(ResourceEvent::pre("urn:policy", "aws:s3/bucketPolicy:BucketPolicy"));
    state.apply_event(ResourceEvent::pre("urn:bucket", "aws:s3/bucket:Bucket"));
    state.apply_event(ResourceEvent::pre("urn:index", "aws:s3/bucketObject:BucketObject"));
    state.apply_event(ResourceEvent::outputs("urn:bucket", "aws:s3/bucket:Bucket"));

    let frame = render(&state, &Spinner::new());
    let tail: Vec<String> = frame.lines[5..].iter().map(ToString::to_string).collect();

    assert_eq!(
        tail,
        vec![
            "Update in progress: [aws:s3/bucketObject:BucketObject, aws:s3/bucketPolicy:BucketPolicy]"
                .to_string(),
            "Update complete: [aws:s3/bucket:Bucket]".to_string(),
        ]
    );
}

#[test]
fn renders_single_success_line_when_finished() {
    let mut state = running_update();
    state.apply_event(ResourceEvent::pre("urn:bucket", "aws:s3/bucket:Bucket"));
    state.finish(&Outcome::success("Website URL: http://site.example"));

    let frame = render(&state, &Spinner::new());

    assert_eq!(frame.len(), 1);
    assert_eq!(frame.lines[0].marker, Some(Marker::Success));
    assert_eq!(
        frame.to_string(),
        "✔ Success! Website URL: http://site.example\n"
    );
}

#[test]
fn renders_failure_line_with_message() {
    let mut state = running_update();
    state.finish(&Outcome::failure("InvalidRegion"));

    let frame = render(&state, &Spinner::new());

    assert_eq!(frame.to_string(), "✖ Failure! InvalidRegion\n");
}

#[test]
fn rendering_is_idempotent() {
    let mut state = running_update();
    state.apply_event(ResourceEvent::pre("urn:bucket", "aws:s3/bucket:Bucket"));
    let spinner = Spinner::new();

    let first = render(&state, &spinner).to_string();
    let second = render(&state, &spinner).to_string();

    assert_eq!(first, second);
}

#[test]
fn spinner_cycles_through_frames() {
    let mut spinner = Spinner::new();
    let first = spinner.glyph();

    for _ in 0..7 {
        spinner.advance();
        assert_ne!(spinner.glyph(), first);
    }
    spinner.advance();
    assert_eq!(spinner.glyph(), first);
}
