//! Integration tests for the `onosdash` CLI binary.
//!
//! Argument parsing, settings management and error mapping run without a
//! controller; the data commands run against a wiremock stand-in.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `onosdash` binary with env isolation.
///
/// Clears every `ONOSDASH_*` variable the CLI reads and points the
/// settings file into `home`, so tests never touch the real settings.
fn onosdash_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("onosdash");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("ONOSDASH_CONFIG", home.join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("ONOSDASH_PROFILE")
        .env_remove("ONOSDASH_CONTROLLER_IP")
        .env_remove("ONOSDASH_CONTROLLER_PORT")
        .env_remove("ONOSDASH_USERNAME")
        .env_remove("ONOSDASH_PASSWORD")
        .env_remove("ONOSDASH_TIMEOUT")
        .env_remove("ONOSDASH_OUTPUT");
    cmd
}

/// A command aimed at `server`, with the password supplied through the
/// environment so the keyring is never consulted.
fn controller_cmd(home: &Path, server: &MockServer) -> assert_cmd::Command {
    let addr = server.address();
    let mut cmd = onosdash_cmd(home);
    cmd.env("ONOSDASH_PASSWORD", "rocks").args([
        "--controller-ip",
        &addr.ip().to_string(),
        "--controller-port",
        &addr.port().to_string(),
    ]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_json(server: &MockServer, suffix: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/onos/v1/{suffix}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_controller(server: &MockServer) {
    mount_json(
        server,
        "devices",
        json!({ "devices": [
            { "id": "of:0000000000000001", "type": "SWITCH", "available": true },
            { "id": "of:0000000000000002", "type": "SWITCH", "available": false }
        ]}),
    )
    .await;
    mount_json(server, "hosts", json!({ "hosts": [{ "id": "00:00:00:00:00:01/None" }] })).await;
    mount_json(
        server,
        "flows",
        json!({ "flows": [{ "id": "1", "bytes": 1024 }, { "id": "2", "bytes": 2048 }] }),
    )
    .await;
    mount_json(server, "links", json!({ "links": [] })).await;
    mount_json(
        server,
        "topology",
        json!({ "time": 1, "devices": 2, "links": 0, "clusters": 1 }),
    )
    .await;
}

/// Run a prepared command off the async runtime so the mock server keeps
/// serving while the binary blocks.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = onosdash_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    onosdash_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ONOS")
                .and(predicate::str::contains("devices"))
                .and(predicate::str::contains("watch"))
                .and(predicate::str::contains("topology")),
        );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    onosdash_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("onosdash"));
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    onosdash_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    let output = onosdash_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

// ── Settings ────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_env() {
    let home = TempDir::new().unwrap();
    onosdash_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    onosdash_cmd(home.path())
        .args(["config", "set", "controller_ip", "10.0.0.5"])
        .assert()
        .success();
    onosdash_cmd(home.path())
        .args(["config", "set", "password", "hunter2"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(home.path().join("config.toml")).unwrap();
    assert!(saved.contains("10.0.0.5"));

    onosdash_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("controller_ip = \"10.0.0.5\"")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_config_set_rejects_bad_values() {
    let home = TempDir::new().unwrap();
    onosdash_cmd(home.path())
        .args(["config", "set", "controller_port", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("controller_port"));

    onosdash_cmd(home.path())
        .args(["config", "set", "colour", "red"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("valid keys"));
}

#[test]
fn test_config_set_keeps_env_overrides_out_of_file() {
    let home = TempDir::new().unwrap();
    onosdash_cmd(home.path())
        .env("ONOSDASH_PROFILES__DEFAULT__PASSWORD", "s3cret-from-env")
        .args(["config", "set", "refresh_interval", "3000"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(home.path().join("config.toml")).unwrap();
    assert!(saved.contains("3000"));
    assert!(!saved.contains("s3cret-from-env"));
}

#[test]
fn test_config_set_leaves_broken_file_untouched() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("config.toml");
    let broken = "[profiles.default\ncontroller_ip = ";
    std::fs::write(&file, broken).unwrap();

    onosdash_cmd(home.path())
        .args(["config", "set", "refresh_interval", "3000"])
        .assert()
        .failure();
    assert_eq!(std::fs::read_to_string(&file).unwrap(), broken);
}

#[test]
fn test_config_reset_removes_file() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("config.toml");
    onosdash_cmd(home.path())
        .args(["config", "set", "refresh_interval", "2000"])
        .assert()
        .success();
    assert!(file.exists());

    onosdash_cmd(home.path())
        .args(["config", "reset", "--yes"])
        .assert()
        .success();
    assert!(!file.exists());
}

#[test]
fn test_unknown_profile_is_usage_error() {
    let home = TempDir::new().unwrap();
    onosdash_cmd(home.path())
        .args(["--profile", "lab", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("lab"));
}

// ── Controller errors ───────────────────────────────────────────────

#[test]
fn test_connection_test_unreachable_exit_code() {
    let home = TempDir::new().unwrap();
    onosdash_cmd(home.path())
        .env("ONOSDASH_PASSWORD", "rocks")
        .args(["--controller-port", "1", "--timeout", "2", "test"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("127.0.0.1:1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_test_unauthorized_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/onos/v1/devices"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = controller_cmd(home.path(), &server);
    cmd.arg("test");
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_device_get_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/onos/v1/devices/of:missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = controller_cmd(home.path(), &server);
    cmd.args(["devices", "get", "of:missing"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("devices list"));
}

// ── Data commands ───────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_json() {
    let server = MockServer::start().await;
    mount_controller(&server).await;

    let home = TempDir::new().unwrap();
    let mut cmd = controller_cmd(home.path(), &server);
    cmd.args(["devices", "list", "-o", "json"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let devices: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(devices.as_array().unwrap().len(), 2);
    assert_eq!(devices[0]["id"], "of:0000000000000001");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_plain() {
    let server = MockServer::start().await;
    mount_controller(&server).await;

    let home = TempDir::new().unwrap();
    let mut cmd = controller_cmd(home.path(), &server);
    cmd.args(["devices", "list", "-o", "plain"]);
    let output = run(cmd).await;
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "of:0000000000000001\nof:0000000000000002\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json_summary() {
    let server = MockServer::start().await;
    mount_controller(&server).await;

    let home = TempDir::new().unwrap();
    let mut cmd = controller_cmd(home.path(), &server);
    cmd.args(["status", "-o", "json"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["connected"], true);
    assert_eq!(report["devices"], 2);
    assert_eq!(report["available_devices"], 1);
    assert_eq!(report["hosts"], 1);
    assert_eq!(report["flows"], 2);
    assert_eq!(report["throughput"]["total_bytes"], 3072);
    assert_eq!(report["outcome"]["status"], "success");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_unreachable_controller() {
    let home = TempDir::new().unwrap();
    let mut cmd = onosdash_cmd(home.path());
    cmd.env("ONOSDASH_PASSWORD", "rocks")
        .args(["--controller-port", "1", "--timeout", "2", "status"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(7));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_emits_ndjson_per_cycle() {
    let server = MockServer::start().await;
    mount_controller(&server).await;

    let home = TempDir::new().unwrap();
    let mut cmd = controller_cmd(home.path(), &server);
    cmd.args(["-o", "json", "watch", "--interval", "300", "--count", "2"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let cycles: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0]["cycle"], 1);
    assert_eq!(cycles[1]["cycle"], 2);
}
