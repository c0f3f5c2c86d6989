//! Help and version specs

use crate::prelude::*;

#[test]
fn help_describes_the_tool() {
    let project = Project::empty();

    project
        .sitedeploy()
        .arg("--help")
        .passes()
        .stdout_has("static website")
        .stdout_has("--config");
}

#[test]
fn version_is_printed() {
    let project = Project::empty();

    project
        .sitedeploy()
        .arg("--version")
        .passes()
        .stdout_has("sitedeploy");
}

#[test]
fn unknown_flag_is_rejected() {
    let project = Project::empty();

    project
        .sitedeploy()
        .arg("--mode=destroy")
        .assert()
        .failure()
        .stderr_has("--mode");
}
