//! Runs the built `work21-gate` binary with a controlled environment.

#![cfg(unix)]

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn gate(dir: &TempDir, vars: &[(&str, String)], args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_work21-gate"));
    // Empty working directory keeps any local .env out of the picture
    command.current_dir(dir.path()).env_clear();
    if let Some(path) = std::env::var_os("PATH") {
        command.env("PATH", path);
    }
    command.envs(vars.iter().map(|(k, v)| (*k, v.as_str())));
    command.args(args).output().unwrap()
}

fn sqlite_url(path: &Path, query: &str) -> String {
    format!("sqlite+aiosqlite://{}{}", path.display(), query)
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn test_exits_non_zero_when_database_never_answers() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("server-started");
    let missing = dir.path().join("missing").join("work21.db");

    let output = gate(
        &dir,
        &[
            ("DATABASE_URL", sqlite_url(&missing, "")),
            ("GATE_MAX_ATTEMPTS", "2".to_string()),
            ("GATE_RETRY_INTERVAL_SECS", "0".to_string()),
        ],
        &["--", "touch", marker.to_str().unwrap()],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "stderr: {stderr}");
    assert_eq!(count(&stderr, "Database not ready yet"), 2, "stderr: {stderr}");
    assert!(!marker.exists());
}

#[test]
fn test_missing_server_command_fails_before_waiting() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing").join("work21.db");

    let output = gate(&dir, &[("DATABASE_URL", sqlite_url(&missing, ""))], &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Nothing to hand off to"), "stderr: {stderr}");
    assert!(!stderr.contains("Waiting for database"), "stderr: {stderr}");
}

#[test]
fn test_flag_overrides_invalid_environment_value() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("server-started");
    let database = dir.path().join("work21.db");

    let output = gate(
        &dir,
        &[
            ("DATABASE_URL", sqlite_url(&database, "?mode=rwc")),
            ("GATE_MAX_ATTEMPTS", "0".to_string()),
            ("SERVER_COMMAND", "false".to_string()),
        ],
        &["--max-attempts", "1", "--skip-migrations", "--", "touch", marker.to_str().unwrap()],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    // The server replaced the gate: its exit status and side effects are what we see
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(marker.exists());
}
