//! Shared helpers for CLI specs

pub use predicates::prelude::*;

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// A scratch project directory the CLI runs in
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root
    pub fn file(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// The CLI, run from the project with piped stdio and logs kept inside
    /// the project
    pub fn sitedeploy(&self) -> Command {
        let mut cmd = Command::cargo_bin("sitedeploy").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_STATE_HOME", self.path().join("state"))
            .env_remove("RUST_LOG")
            .write_stdin("");
        cmd
    }

    pub fn log_path(&self) -> std::path::PathBuf {
        self.path().join("state/sitedeploy/sitedeploy.log")
    }
}

/// Assertion shorthands for CLI runs
pub trait CliAssert {
    fn passes(&mut self) -> Assert;
    fn fails_with(&mut self, code: i32) -> Assert;
}

impl CliAssert for Command {
    fn passes(&mut self) -> Assert {
        self.assert().success()
    }

    fn fails_with(&mut self, code: i32) -> Assert {
        self.assert().failure().code(code)
    }
}

pub trait OutputAssert {
    fn stdout_has(self, needle: &str) -> Assert;
    fn stderr_has(self, needle: &str) -> Assert;
}

impl OutputAssert for Assert {
    fn stdout_has(self, needle: &str) -> Assert {
        self.stdout(predicate::str::contains(needle))
    }

    fn stderr_has(self, needle: &str) -> Assert {
        self.stderr(predicate::str::contains(needle))
    }
}

pub const NOT_INTERACTIVE: &str = "Prompt couldn't be rendered in the current environment.";
