//! Configuration file specs

use crate::prelude::*;

#[test]
fn malformed_default_config_exits_with_two() {
    let project = Project::empty();
    project.file("sitedeploy.toml", "stack = [not toml");

    project
        .sitedeploy()
        .fails_with(2)
        .stderr_has("error: invalid config")
        .stderr_has("sitedeploy.toml");
}

#[test]
fn unknown_key_is_rejected() {
    let project = Project::empty();
    project.file("sitedeploy.toml", "regoin = \"us-west-2\"\n");

    project
        .sitedeploy()
        .fails_with(2)
        .stderr_has("regoin");
}

#[test]
fn missing_explicit_config_exits_with_two() {
    let project = Project::empty();

    project
        .sitedeploy()
        .args(["--config", "nowhere.toml"])
        .fails_with(2)
        .stderr_has("nowhere.toml");
}

#[test]
fn valid_config_reaches_the_prompt() {
    let project = Project::empty();
    project.file(
        "deploy/site.toml",
        r#"
stack = "staging"
log_file = "logs/run.log"

[config]
"aws:region" = "eu-west-1"
"#,
    );

    project
        .sitedeploy()
        .args(["--config", "deploy/site.toml"])
        .fails_with(2)
        .stderr_has(NOT_INTERACTIVE);

    let log = std::fs::read_to_string(project.path().join("deploy/logs/run.log")).unwrap();
    assert!(log.contains("staging"), "log:\n{}", log);
}
