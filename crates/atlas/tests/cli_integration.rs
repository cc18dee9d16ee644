//! CLI integration tests for the Atlas command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Argument parsing works as expected
//! - Invalid inputs and unreachable servers fail with a non-zero exit
//!
//! Note: These tests do not require a running MCP server. Each command runs
//! with an empty config directory so the user's own config is not picked up.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the atlas binary, isolated from any real config.
fn atlas(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("atlas").unwrap();
    cmd.current_dir(dir.path())
        .env("ATLAS_CONFIG_DIR", dir.path())
        .env_remove("ATLAS_MCP_URL")
        .env_remove("RUST_LOG");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    let dir = TempDir::new().unwrap();
    atlas(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Atlas"))
        .stdout(predicate::str::contains("MCP"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    atlas(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("atlas"));
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    atlas(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("tools"))
        .stdout(predicate::str::contains("call"));
}

#[test]
fn test_global_flags_in_help() {
    let dir = TempDir::new().unwrap();
    atlas(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_tools_help() {
    let dir = TempDir::new().unwrap();
    atlas(&dir)
        .args(["tools", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--full"));
}

#[test]
fn test_call_help() {
    let dir = TempDir::new().unwrap();
    atlas(&dir)
        .args(["call", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("KEY VALUE"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Error Handling Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    atlas(&dir)
        .arg("nonexistent-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_call_requires_tool_name() {
    let dir = TempDir::new().unwrap();
    atlas(&dir).arg("call").assert().failure();
}

#[test]
fn test_call_odd_arguments_fail() {
    let dir = TempDir::new().unwrap();
    atlas(&dir)
        .args(["call", "get_layer_fields", "layer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY VALUE pairs"));
}

#[test]
fn test_invalid_url_fails() {
    let dir = TempDir::new().unwrap();
    atlas(&dir)
        .args(["--url", "not a url", "tools"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mcp.url"));
}

#[test]
fn test_invalid_url_from_env_fails() {
    let dir = TempDir::new().unwrap();
    atlas(&dir)
        .env("ATLAS_MCP_URL", "ftp://example.org/mcp")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported scheme"));
}

#[test]
fn test_unreachable_server_reports_kind() {
    let dir = TempDir::new().unwrap();
    atlas(&dir)
        .args(["--url", "http://127.0.0.1:9/mcp", "--timeout", "5", "tools"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("transport error").or(predicate::str::contains("timeout error")),
        );
}

#[test]
fn test_project_config_is_used() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("atlas.toml"), "[mcp]\ntimeout_secs = 0\n").unwrap();

    atlas(&dir)
        .arg("tools")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mcp.timeout_secs"));
}

#[test]
fn test_malformed_config_only_warns() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("atlas.toml"), "not valid toml {{{{").unwrap();

    // Falls back to defaults; the call then fails only because nothing listens.
    atlas(&dir)
        .args(["--url", "http://127.0.0.1:9/mcp", "--timeout", "5", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}
