//! Smoke tests for the CLI surface. Nothing here talks to a network;
//! these only exercise argument parsing and the top-level error path.

use assert_cmd::Command;
use predicates::prelude::*;

fn fcli() -> Command {
    Command::cargo_bin("fcli").unwrap()
}

#[test]
fn help_lists_the_command_surface() {
    fcli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("issues"))
        .stdout(predicate::str::contains("pulls"))
        .stdout(predicate::str::contains("releases"))
        .stdout(predicate::str::contains("notifications"));
}

#[test]
fn version_flag_works() {
    fcli().arg("--version").assert().success();
}

#[test]
fn missing_subcommand_is_an_error() {
    fcli().assert().failure();
}

#[test]
fn unknown_forge_type_is_rejected() {
    fcli()
        .args(["--forge", "sourcehut", "issues", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown forge type"));
}

#[test]
fn comment_requires_a_target() {
    // No --issue/--pull: the command must fail before any network use.
    fcli()
        .env("HOME", std::env::temp_dir())
        .env_remove("XDG_CONFIG_HOME")
        .args(["--forge", "github", "--owner", "o", "--repo", "r"])
        .args(["comment", "-m", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--issue or --pull"));
}
