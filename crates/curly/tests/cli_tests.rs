//! Integration tests for CLI infrastructure

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo_bin;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use curly_testkit::temp_dir_in_workspace;

/// Helper: command running from `dir` with no inherited config override
fn curly(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    cmd.current_dir(dir).env_remove("CURLY_CONFIG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_version_flag() {
    let temp = temp_dir_in_workspace();
    curly(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("curly"));
}

#[test]
fn test_cli_help_flag() {
    let temp = temp_dir_in_workspace();
    curly(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn test_cli_unknown_sink_is_rejected() {
    let temp = temp_dir_in_workspace();
    curly(temp.path())
        .args(["render", "{{x}}", "--trusted", "sql"])
        .assert()
        .failure();
}
