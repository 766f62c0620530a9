//! Tests for the repo-retention binary
//!
//! These tests verify:
//! - `init` writes nothing when its flags are rejected
//! - Failures are reported once on stderr
//! - `init` followed by `verify` succeeds for a valid configuration

use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_repo-retention"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run repo-retention")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path is valid UTF-8")
}

#[test]
fn test_init_with_invalid_flags_leaves_no_file() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("retention.json");

    let output = run_cli(&[
        "init",
        "--state",
        path_arg(&state),
        "--retention-mode",
        "compliance",
    ]);

    assert!(!output.status.success());
    assert!(!state.exists(), "state file should not be created");

    // A corrected retry must not need --force
    let output = run_cli(&[
        "init",
        "--state",
        path_arg(&state),
        "--retention-mode",
        "compliance",
        "--retention-duration",
        "30days",
        "--extend-retention",
        "true",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = run_cli(&["verify", "--state", path_arg(&state)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_failure_is_reported_once() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("retention.json");

    let output = run_cli(&[
        "init",
        "--state",
        path_arg(&state),
        "--retention-mode",
        "governance",
    ]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("retention period is zero").count(),
        1,
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_verify_failure_is_reported_once() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("retention.json");
    std::fs::write(
        &state,
        r#"{"blob":{"mode":"GOVERNANCE","period":"3days"},"maintenance":{"extend_object_locks":false}}"#,
    )
    .unwrap();

    let output = run_cli(&["verify", "--state", path_arg(&state)]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("object lock extension is disabled").count(),
        1,
        "unexpected stderr: {stderr}"
    );
}
