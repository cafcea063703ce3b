//! Integration tests for the style-history CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("style-history").unwrap();
    cmd.env("STYLECAST_CONFIG", temp_dir.path().join("config.toml"));
    cmd.env("STYLECAST_API_URL", "http://127.0.0.1:9");
    cmd.env("XDG_DATA_HOME", temp_dir.path().join("data"));
    cmd
}

#[test]
fn test_help_lists_output_formats() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OUTPUT FORMATS:"))
        .stdout(predicate::str::contains("jsonl"))
        .stdout(predicate::str::contains("--admins-only"));
}

#[test]
fn test_invalid_format_rejected() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .args(["--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_admins_only_requires_users() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir).arg("--admins-only").assert().failure();
}

#[test]
fn test_all_conflicts_with_users() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .args(["--all", "--users"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_zero_limit_is_invalid_input() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .args(["--limit", "0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("--limit"));
}

#[test]
fn test_requires_login() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_network_failure_keeps_session() {
    let temp_dir = TempDir::new().unwrap();
    let token_dir = temp_dir.path().join("data").join("stylecast");
    fs::create_dir_all(&token_dir).unwrap();
    fs::write(token_dir.join("token"), "tok").unwrap();

    cmd(&temp_dir)
        .args(["--format", "json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Network error"));
    assert!(token_dir.join("token").exists());
}
