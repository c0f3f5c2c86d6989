// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine event log reader
//!
//! `pulumi up --event-log <file>` appends one JSON engine event per line while
//! the update runs. The log is followed as it grows and the per-resource
//! events are forwarded as [`ResourceEvent`]s.

use super::EventSender;
use sd_core::ResourceEvent;
use serde::Deserialize;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EngineEvent {
    resource_pre_event: Option<StepEvent>,
    res_outputs_event: Option<StepEvent>,
}

#[derive(Deserialize)]
struct StepEvent {
    metadata: StepMetadata,
}

#[derive(Deserialize)]
struct StepMetadata {
    urn: String,
    #[serde(rename = "type")]
    resource_type: String,
}

/// Parse one event log line. Lines that are not per-resource events yield
/// `None`.
pub(crate) fn parse_line(line: &str) -> Option<ResourceEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let event: EngineEvent = match serde_json::from_str(line) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(error = %e, "skipping unreadable engine event");
            return None;
        }
    };

    if let Some(pre) = event.resource_pre_event {
        return Some(ResourceEvent::Pre {
            urn: pre.metadata.urn,
            resource_type: pre.metadata.resource_type,
        });
    }
    event.res_outputs_event.map(|out| ResourceEvent::Outputs {
        urn: out.metadata.urn,
        resource_type: out.metadata.resource_type,
    })
}

/// Follow the event log at `path` until `stop` fires, forwarding resource
/// events in file order.
///
/// The file may not exist yet when following starts. After `stop` the rest of
/// the file is drained before returning. Returns the number of events
/// forwarded.
pub(crate) async fn follow(
    path: PathBuf,
    events: EventSender,
    mut stop: oneshot::Receiver<()>,
) -> io::Result<usize> {
    let mut stopped = false;

    let file = loop {
        match File::open(&path).await {
            Ok(file) => break file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if stopped {
                    return Ok(0);
                }
                stopped = wait_or_stop(&mut stop).await;
            }
            Err(e) => return Err(e),
        }
    };

    let mut reader = BufReader::new(file);
    let mut line = String::new();
    let mut forwarded = 0;

    loop {
        let read = reader.read_line(&mut line).await?;
        if read > 0 && line.ends_with('\n') {
            if let Some(event) = parse_line(&line) {
                if events.send(event).is_err() {
                    // Receiver gone, nobody is listening any more
                    return Ok(forwarded);
                }
                forwarded += 1;
            }
            line.clear();
            continue;
        }

        if stopped {
            // Trailing line without a newline
            if let Some(event) = parse_line(&line) {
                if events.send(event).is_ok() {
                    forwarded += 1;
                }
            }
            return Ok(forwarded);
        }
        stopped = wait_or_stop(&mut stop).await;
    }
}

/// Sleep one poll interval. Returns true if `stop` fired (or its sender was
/// dropped) meanwhile. Must not be called again after returning true.
async fn wait_or_stop(stop: &mut oneshot::Receiver<()>) -> bool {
    tokio::select! {
        _ = stop => true,
        _ = tokio::time::sleep(POLL_INTERVAL) => false,
    }
}

#[cfg(test)]
#[path = "event_log_tests.rs"]
mod tests;
