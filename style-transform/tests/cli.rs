//! Integration tests for the style-transform CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("style-transform").unwrap();
    cmd.env("STYLECAST_CONFIG", temp_dir.path().join("config.toml"));
    cmd.env("STYLECAST_API_URL", "http://127.0.0.1:9");
    cmd.env("XDG_DATA_HOME", temp_dir.path().join("data"));
    cmd
}

fn write_token(temp_dir: &TempDir) {
    let dir = temp_dir.path().join("data").join("stylecast");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("token"), "some-token").unwrap();
}

#[test]
fn test_help_documents_personas_and_formats() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PERSONAS:"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("--export"))
        .stdout(predicate::str::contains("EXIT CODES:"));
}

#[test]
fn test_blank_argument_is_rejected_without_network() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .arg("   ")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No text provided"));
}

#[test]
fn test_empty_stdin_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .write_stdin("")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No text provided"));
}

#[test]
fn test_oversized_input_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .write_stdin("x".repeat(200 * 1024))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Text too large"));
}

#[test]
fn test_requires_login() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .arg("Taxes are high")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Not logged in"))
        .stderr(predicate::str::contains("style-auth login"));
}

#[test]
fn test_unreachable_backend_is_network_error() {
    let temp_dir = TempDir::new().unwrap();
    write_token(&temp_dir);
    cmd(&temp_dir)
        .args(["--no-animate", "Taxes are high"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Network error"));

    // Transport failures keep the session
    assert!(temp_dir.path().join("data/stylecast/token").exists());
}

#[test]
fn test_invalid_verbosity_is_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .args(["--verbosity", "7", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid verbosity"));
}

#[test]
fn test_invalid_format_is_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    cmd(&temp_dir)
        .args(["--format", "csv", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_bad_config_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[defaults]\nverbosity = 9\n",
    )
    .unwrap();
    cmd(&temp_dir)
        .arg("text")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("defaults.verbosity"));
}
