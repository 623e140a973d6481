//! CLI end-to-end tests
//!
//! Tests for the structlens command-line interface.

mod common;

use assert_cmd::prelude::*;
use common::rectangle_png;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the structlens binary
#[allow(deprecated)]
fn structlens_cmd() -> Command {
    Command::cargo_bin("structlens").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = structlens_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = structlens_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("structlens"));
}

#[test]
fn test_cli_start_help() {
    let mut cmd = structlens_cmd();
    cmd.args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Start the server"));
}

#[test]
fn test_cli_validate_defaults() {
    let mut cmd = structlens_cmd();
    cmd.arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("127.0.0.1:5000"));
}

#[test]
fn test_cli_validate_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("structlens.json");
    fs::write(
        &config_path,
        r#"{"server": {"port": 8123, "static_dir": null}, "analysis": {"canny_low": 200}}"#,
    )
    .unwrap();

    let mut cmd = structlens_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("8123"))
        .stdout(predicate::str::contains("canny_low"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("broken.json");
    fs::write(&config_path, "{ not json").unwrap();

    let mut cmd = structlens_cmd();
    cmd.arg("validate").arg(&config_path).assert().failure();
}

#[test]
fn test_cli_analyze_writes_result() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scene.png");
    fs::write(&input, rectangle_png(64, 64, (12, 7, 40, 50))).unwrap();
    let out_dir = dir.path().join("out");

    let output = structlens_cmd()
        .arg("analyze")
        .arg(&input)
        .arg("--output-dir")
        .arg(&out_dir)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["number_of_parts"].as_u64().unwrap() >= 1);
    let name = report["output_image"].as_str().unwrap();
    assert!(out_dir.join(name).exists());
}

#[test]
fn test_cli_analyze_missing_file() {
    let mut cmd = structlens_cmd();
    cmd.args(["analyze", "/nonexistent/scene.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_analyze_rejects_text_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "hello").unwrap();

    let mut cmd = structlens_cmd();
    cmd.arg("analyze")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed"));
}
