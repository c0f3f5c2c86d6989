// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;
use tokio::sync::mpsc;

const BUCKET_URN: &str = "urn:pulumi:dev::inlineNode::aws:s3/bucket:Bucket::s3-website-bucket";

fn pre_line(urn: &str, ty: &str) -> String {
    format!(
        r#"{{"sequence":3,"timestamp":1700000000,"resourcePreEvent":{{"metadata":{{"op":"create","urn":"{}","type":"{}","provider":""}},"planning":false}}}}"#,
        urn, ty
    )
}

fn outputs_line(urn: &str, ty: &str) -> String {
    format!(
        r#"{{"sequence":4,"timestamp":1700000001,"resOutputsEvent":{{"metadata":{{"op":"create","urn":"{}","type":"{}","provider":""}},"planning":false}}}}"#,
        urn, ty
    )
}

#[test]
fn parses_resource_pre_event() {
    let event = parse_line(&pre_line(BUCKET_URN, "aws:s3/bucket:Bucket")).unwrap();

    assert_eq!(
        event,
        ResourceEvent::pre(BUCKET_URN, "aws:s3/bucket:Bucket")
    );
}

#[test]
fn parses_resource_outputs_event() {
    let event = parse_line(&outputs_line(BUCKET_URN, "aws:s3/bucket:Bucket")).unwrap();

    assert_eq!(
        event,
        ResourceEvent::outputs(BUCKET_URN, "aws:s3/bucket:Bucket")
    );
}

#[test]
fn ignores_other_engine_events() {
    assert!(parse_line(r#"{"sequence":0,"timestamp":1,"cancelEvent":{}}"#).is_none());
    assert!(parse_line(r#"{"sequence":1,"timestamp":1,"diagnosticEvent":{"message":"hi"}}"#).is_none());
    assert!(parse_line("").is_none());
    assert!(parse_line("not json").is_none());
}

#[tokio::test]
async fn follow_forwards_existing_lines_after_stop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{}", pre_line(BUCKET_URN, "aws:s3/bucket:Bucket")).unwrap();
    // Trailing line without newline is still picked up
    write!(file, "{}", outputs_line(BUCKET_URN, "aws:s3/bucket:Bucket")).unwrap();
    drop(file);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = oneshot::channel();
    stop_tx.send(()).unwrap();

    let forwarded = follow(path, tx, stop_rx).await.unwrap();

    assert_eq!(forwarded, 2);
    assert!(matches!(rx.recv().await, Some(ResourceEvent::Pre { .. })));
    assert!(matches!(rx.recv().await, Some(ResourceEvent::Outputs { .. })));
}

#[tokio::test]
async fn follow_picks_up_file_created_later() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = oneshot::channel();
    let follower = tokio::spawn(follow(path.clone(), tx, stop_rx));

    tokio::time::sleep(Duration::from_millis(120)).await;
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{}", pre_line(BUCKET_URN, "aws:s3/bucket:Bucket")).unwrap();
    file.flush().unwrap();

    // Delivered live, before stop
    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap();
    assert!(matches!(first, Some(ResourceEvent::Pre { .. })));

    writeln!(file, "{}", outputs_line(BUCKET_URN, "aws:s3/bucket:Bucket")).unwrap();
    drop(file);
    stop_tx.send(()).unwrap();

    assert_eq!(follower.await.unwrap().unwrap(), 2);
    assert!(matches!(rx.recv().await, Some(ResourceEvent::Outputs { .. })));
}

#[tokio::test]
async fn follow_returns_when_log_never_appears() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, _rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = oneshot::channel();
    drop(stop_tx);

    let forwarded = follow(dir.path().join("missing.jsonl"), tx, stop_rx)
        .await
        .unwrap();

    assert_eq!(forwarded, 0);
}
