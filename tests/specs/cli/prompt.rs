//! Mode prompt specs
//!
//! Under the test harness stdin is a pipe, so the prompt can never render.

use crate::prelude::*;

#[test]
fn piped_stdin_fails_before_any_phase() {
    let project = Project::empty();

    project
        .sitedeploy()
        .fails_with(2)
        .stderr_has(NOT_INTERACTIVE)
        .stdout(predicate::str::contains("Creating stack").not());
}

#[test]
fn prompt_failure_is_logged() {
    let project = Project::empty();

    project.sitedeploy().fails_with(2);

    let log = std::fs::read_to_string(project.log_path()).unwrap();
    assert!(log.contains("sitedeploy starting"), "log:\n{}", log);
    assert!(log.contains("sitedeploy stopped"), "log:\n{}", log);
    assert!(log.contains(NOT_INTERACTIVE), "log:\n{}", log);
}
