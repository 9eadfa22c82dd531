//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary and verify exit codes and output. None of
//! them reach the network: each stops before or at authentication.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(args: &[&str], home: &Path) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_contactfeed"))
        .args(args)
        .env("HOME", home)
        .env_remove("CONTACTFEED_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_no_action_prints_usage() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&[], home.path());
    assert_eq!(code, 0);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("--action"));
    assert!(stdout.contains("Entry field syntax"));
}

#[test]
fn test_both_feeds_rejected_before_auth() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        &["--contactfeed", "--groupfeed", "--action", "list"],
        home.path(),
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error: Only one of contactfeed / groupfeed should be specified"));
    assert!(
        !home.path().join(".config/contactfeed/config.toml").exists(),
        "config should not be touched"
    );
}

#[test]
fn test_missing_key_file_reported() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(&["--action", "list"], home.path());
    assert_eq!(code, 1);
    assert!(stderr.contains("account.key_file"), "stderr: {stderr}");
    // Defaults are written on first use.
    assert!(home.path().join(".config/contactfeed/config.toml").exists());
}

#[test]
fn test_unreadable_key_file_reported() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("custom.toml");
    std::fs::write(&config, "[feed]\nprojection = \"full\"\n").unwrap();
    let key = home.path().join("missing-key.json");

    let (code, _, stderr) = run_cli(
        &[
            "--config",
            config.to_str().unwrap(),
            "--key-file",
            key.to_str().unwrap(),
            "--action",
            "list",
        ],
        home.path(),
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to read key file"), "stderr: {stderr}");
}

#[test]
fn test_unknown_action_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(&["--action", "purge"], home.path());
    assert_eq!(code, 2);
    assert!(stderr.contains("unknown action"));
}
