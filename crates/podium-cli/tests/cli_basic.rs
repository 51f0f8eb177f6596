//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. The
//! interactive `timer run` command blocks on stdin and is covered by the
//! core integration tests instead.

use std::process::Command;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-p", "podium-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_timer_status() {
    let (code, stdout, _) = run_cli(&["timer", "status"]);
    assert_eq!(code, 0, "Timer status failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["running"], false);
    assert_eq!(parsed["signal"], "blank");
}

#[test]
fn test_profiles_list() {
    let (code, stdout, _) = run_cli(&["profiles", "list"]);
    assert_eq!(code, 0, "Profiles list failed");
    assert!(stdout.contains("Ice Breaker Speech"));
    assert!(stdout.contains("Table Topic Speech"));
}

#[test]
fn test_profiles_list_json() {
    let (code, stdout, _) = run_cli(&["profiles", "list", "--json"]);
    assert_eq!(code, 0, "Profiles list JSON failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed.as_array().map(|a| a.len()), Some(5));
}

#[test]
fn test_records_list() {
    let (code, _, _) = run_cli(&["records", "list"]);
    assert_eq!(code, 0, "Records list failed");
}

#[test]
fn test_unknown_category_fails() {
    let (code, _, stderr) = run_cli(&["timer", "run", "keynote"]);
    assert_ne!(code, 0, "Unknown category should fail");
    assert!(stderr.contains("Unknown speech category"));
}

#[test]
fn test_config_path() {
    let (code, stdout, _) = run_cli(&["config", "path"]);
    assert_eq!(code, 0, "Config path failed");
    assert!(stdout.contains("config.toml"));
}
