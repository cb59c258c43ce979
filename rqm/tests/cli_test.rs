//! CLI tests for the rqm binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MBID: &str = "b10bbbfc-cf9e-42e0-be17-e2c3e1d2600d";

/// rqm with home, data and config dirs pointed into a scratch directory
fn rqm(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rqm").expect("rqm binary should be built");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &Path, base_url: &str) -> std::path::PathBuf {
    let config_path = dir.join("rqm.yml");
    let yaml = format!(
        "server:\n  base-url: \"{}\"\n  timeout-ms: 5000\nscheduler:\n  rate-interval-ms: 20\nretry:\n  max-retries: 2\n",
        base_url
    );
    fs::write(&config_path, yaml).unwrap();
    config_path
}

// =============================================================================
// Offline commands
// =============================================================================

#[test]
fn test_escape_prints_escaped_text() {
    let home = TempDir::new().unwrap();
    rqm(home.path())
        .args(["escape", "a:b && c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a\\:b \\&& c"));
}

#[test]
fn test_work_types_lists_known_types() {
    let home = TempDir::new().unwrap();
    rqm(home.path())
        .arg("work-types")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mass"))
        .stdout(predicate::str::contains("Song"));
}

#[test]
fn test_submit_rejects_invalid_batch_before_sending() {
    let home = TempDir::new().unwrap();
    // Nothing listens here; validation must fail first
    let config = write_config(home.path(), "http://127.0.0.1:9");
    let batch = home.path().join("batch.yml");
    fs::write(&batch, "edits:\n  - kind: add-iswc\n    work: not-an-mbid\n    iswc: T-345.246.800-1\n").unwrap();

    rqm(home.path())
        .arg("--config")
        .arg(&config)
        .arg("submit")
        .arg(&batch)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid edit #1"));
}

#[test]
fn test_submit_missing_file_fails() {
    let home = TempDir::new().unwrap();
    rqm(home.path())
        .args(["submit", "does-not-exist.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

// =============================================================================
// Against a mock server
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_batch_reports_each_edit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/work/{}/add-iswc", MBID)))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/edit/7/approve"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), &server.uri());
    let batch = home.path().join("batch.yml");
    fs::write(
        &batch,
        format!(
            "edits:\n  - kind: add-iswc\n    work: {}\n    iswc: T-345.246.800-1\n  - kind: approve-edit\n    edit-id: 7\n",
            MBID
        ),
    )
    .unwrap();

    let mut cmd = rqm(home.path());
    cmd.arg("--config").arg(&config).args(["submit", "--format", "json"]).arg(&batch);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("\"ok\":true"))
        .stdout(predicate::str::contains("/edit/7/approve"));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_reports_failed_edits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), &server.uri());
    let batch = home.path().join("batch.yml");
    fs::write(&batch, "edits:\n  - kind: approve-edit\n    edit-id: 1\n").unwrap();

    let mut cmd = rqm(home.path());
    cmd.arg("--config").arg(&config).arg("submit").arg(&batch);
    let assert = tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap();

    assert
        .failure()
        .stdout(predicate::str::contains("✗"))
        .stderr(predicate::str::contains("1 of 1 edits failed"));

    // 404 is permanent: one request, no retries
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
