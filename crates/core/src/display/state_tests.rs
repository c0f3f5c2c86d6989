// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

const BUCKET: &str = "urn:pulumi:dev::inlineNode::aws:s3/bucket:Bucket::s3-website-bucket";
const OBJECT: &str = "urn:pulumi:dev::inlineNode::aws:s3/bucketObject:BucketObject::index";
const POLICY: &str = "urn:pulumi:dev::inlineNode::aws:s3/bucketPolicy:BucketPolicy::bucketPolicy";

#[test]
fn new_state_is_empty() {
    let state = DisplayState::new();

    assert_eq!(state.phase_label(), "");
    assert!(!state.is_finished());
    assert!(!state.is_failed());
    assert!(!state.has_resources());
}

#[test]
fn start_phase_records_previous_label() {
    let mut state = DisplayState::new();

    assert!(state.start_phase("Creating stack..."));
    assert!(state.start_phase("Ensuring plugins..."));

    assert_eq!(state.phase_label(), "Ensuring plugins...");
    assert_eq!(state.finished_phases(), &["Creating stack...".to_string()]);
}

#[test]
fn phase_change_keeps_resource_maps() {
    let mut state = DisplayState::new();
    state.start_phase("Running update...");
    state.apply_event(ResourceEvent::pre(BUCKET, "aws:s3/bucket:Bucket"));
    state.apply_event(ResourceEvent::pre(OBJECT, "aws:s3/bucketObject:BucketObject"));
    state.apply_event(ResourceEvent::outputs(OBJECT, "aws:s3/bucketObject:BucketObject"));

    state.start_phase("Deleting stack...");

    assert_eq!(state.in_flight().len(), 1);
    assert_eq!(state.completed().len(), 1);
}

#[test]
fn outputs_event_moves_resource_to_completed() {
    let mut state = DisplayState::new();

    state.apply_event(ResourceEvent::pre(BUCKET, "aws:s3/bucket:Bucket"));
    assert_eq!(
        state.in_flight().get(BUCKET).map(String::as_str),
        Some("aws:s3/bucket:Bucket")
    );

    state.apply_event(ResourceEvent::outputs(BUCKET, "aws:s3/bucket:Bucket"));
    assert!(state.in_flight().is_empty());
    assert!(state.completed().contains_key(BUCKET));
}

#[test]
fn repeated_pre_event_overwrites_type() {
    let mut state = DisplayState::new();

    state.apply_event(ResourceEvent::pre(BUCKET, "old"));
    state.apply_event(ResourceEvent::pre(BUCKET, "aws:s3/bucket:Bucket"));

    assert_eq!(state.in_flight().len(), 1);
    assert_eq!(state.in_flight()[BUCKET], "aws:s3/bucket:Bucket");
}

#[test]
fn pre_event_after_outputs_moves_resource_back_in_flight() {
    let mut state = DisplayState::new();

    state.apply_event(ResourceEvent::pre(POLICY, "aws:s3/bucketPolicy:BucketPolicy"));
    state.apply_event(ResourceEvent::outputs(POLICY, "aws:s3/bucketPolicy:BucketPolicy"));
    state.apply_event(ResourceEvent::pre(POLICY, "aws:s3/bucketPolicy:BucketPolicy"));

    assert!(state.in_flight().contains_key(POLICY));
    assert!(!state.completed().contains_key(POLICY));

    state.apply_event(ResourceEvent::outputs(POLICY, "aws:s3/bucketPolicy:BucketPolicy"));

    assert!(state.in_flight().is_empty());
    assert_eq!(state.completed().len(), 1);
}

#[test]
fn full_update_leaves_nothing_in_flight() {
    let mut state = DisplayState::new();
    state.start_phase("Running update...");

    for (urn, ty) in [
        (BUCKET, "aws:s3/bucket:Bucket"),
        (OBJECT, "aws:s3/bucketObject:BucketObject"),
        (POLICY, "aws:s3/bucketPolicy:BucketPolicy"),
    ] {
        state.apply_event(ResourceEvent::pre(urn, ty));
        state.apply_event(ResourceEvent::outputs(urn, ty));
    }
    state.finish(&Outcome::success("Website URL: http://site.example"));

    assert!(state.in_flight().is_empty());
    assert_eq!(state.completed().len(), 3);
    assert!(state.is_finished());
    assert!(!state.is_failed());
    assert!(state.message().contains("http://site.example"));
}

#[test]
fn failure_sets_failed_and_message() {
    let mut state = DisplayState::new();
    state.start_phase("Setting configuration...");

    assert!(state.finish(&Outcome::failure("InvalidRegion")));

    assert!(state.is_finished());
    assert!(state.is_failed());
    assert_eq!(state.message(), "InvalidRegion");
}

#[test]
fn finished_state_is_frozen() {
    let mut state = DisplayState::new();
    state.start_phase("Running update...");
    state.apply_event(ResourceEvent::pre(BUCKET, "aws:s3/bucket:Bucket"));
    state.finish(&Outcome::failure("boom"));
    let frozen = state.clone();

    assert!(!state.start_phase("Deleting stack..."));
    assert!(!state.apply_event(ResourceEvent::outputs(BUCKET, "aws:s3/bucket:Bucket")));
    assert!(!state.finish(&Outcome::success("late")));

    assert_eq!(state, frozen);
}

/// Interleave per-resource event lists using `picks` to choose which
/// resource advances next, preserving order per resource.
///
/// Each resource runs `cycles` full pre/outputs rounds, then a last pre
/// that is followed by outputs only when `done`.
fn interleave(resources: &[(usize, bool)], picks: &[usize]) -> Vec<ResourceEvent> {
    let mut queues: Vec<Vec<ResourceEvent>> = resources
        .iter()
        .enumerate()
        .map(|(i, (cycles, done))| {
            let urn = format!("urn:res-{}", i);
            let ty = format!("type-{}", i % 3);
            let mut events = Vec::new();
            for _ in 0..*cycles {
                events.push(ResourceEvent::pre(urn.clone(), ty.clone()));
                events.push(ResourceEvent::outputs(urn.clone(), ty.clone()));
            }
            events.push(ResourceEvent::pre(urn.clone(), ty.clone()));
            if *done {
                events.push(ResourceEvent::outputs(urn, ty));
            }
            // Popped from the back
            events.reverse();
            events
        })
        .collect();

    let mut out = Vec::new();
    let mut pick = picks.iter().cycle();
    loop {
        let live: Vec<usize> = (0..queues.len())
            .filter(|&i| !queues[i].is_empty())
            .collect();
        if live.is_empty() {
            break;
        }
        let chosen = live[pick.next().copied().unwrap_or(0) % live.len()];
        if let Some(event) = queues[chosen].pop() {
            out.push(event);
        }
    }
    out
}

proptest! {
    #[test]
    fn in_flight_and_completed_partition_seen_resources(
        resources in proptest::collection::vec((0usize..3, any::<bool>()), 1..12),
        picks in proptest::collection::vec(0usize..64, 1..32),
    ) {
        let mut state = DisplayState::new();
        state.start_phase("Running update...");
        for event in interleave(&resources, &picks) {
            state.apply_event(event);
        }

        for (i, (_, done)) in resources.iter().enumerate() {
            let urn = format!("urn:res-{}", i);
            prop_assert_eq!(state.completed().contains_key(&urn), *done);
            prop_assert_eq!(state.in_flight().contains_key(&urn), !*done);
        }
        prop_assert!(state
            .in_flight()
            .keys()
            .all(|urn| !state.completed().contains_key(urn)));
        prop_assert_eq!(
            state.in_flight().len() + state.completed().len(),
            resources.len()
        );
    }
}
