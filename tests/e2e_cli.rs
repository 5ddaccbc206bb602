//! CLI end-to-end tests
//!
//! Tests for the artcare command-line interface.

mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the artcare binary
#[allow(deprecated)]
fn artcare_cmd() -> Command {
    let mut cmd = Command::cargo_bin("artcare").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write a config whose database lives inside `temp`.
fn write_config(temp: &TempDir, extra: &str) -> PathBuf {
    let config_file = temp.path().join("artcare.toml");
    let db_path = temp.path().join("data").join("artcare.db");
    fs::write(
        &config_file,
        format!(
            "# test config\n[database]\npath = \"{}\"\n{}",
            db_path.display(),
            extra
        ),
    )
    .unwrap();
    config_file
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

const SNAPSHOT: &str = r#"{
    "version": "1.0",
    "timestamp": "2024-05-01T00:00:00Z",
    "data": {
        "locations": [{
            "id": "11111111-1111-4111-8111-111111111111",
            "name": "Sunrise Center",
            "created_at": "2024-01-01T00:00:00Z"
        }],
        "seniors": [{
            "id": "22222222-2222-4222-8222-222222222222",
            "name": "Mrs. Lin",
            "location_id": "11111111-1111-4111-8111-111111111111",
            "created_at": "2024-01-01T00:00:00Z"
        }],
        "works": [{
            "id": "33333333-3333-4333-8333-333333333333",
            "title": "Clay fish",
            "image_url": "https://res.cloudinary.com/demo/image/upload/fish.jpg",
            "materials": ["黏土"],
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }],
        "teaching_records": [{
            "id": "44444444-4444-4444-8444-444444444444",
            "work_id": "33333333-3333-4333-8333-333333333333",
            "location_id": "11111111-1111-4111-8111-111111111111",
            "teaching_date": "2024-02-14",
            "photo_urls": [],
            "created_at": "2024-02-14T03:00:00Z"
        }],
        "teaching_participants": [{
            "id": "55555555-5555-4555-8555-555555555555",
            "teaching_record_id": "44444444-4444-4444-8444-444444444444",
            "senior_id": "22222222-2222-4222-8222-222222222222",
            "completion_status": "完成"
        }],
        "filter_options": []
    },
    "stats": {"works_count": 1, "locations_count": 1, "seniors_count": 1, "records_count": 1}
}"#;

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = artcare_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = artcare_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("artcare"))
        .stdout(predicate::str::contains("restore"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = artcare_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("artcare "));
}

#[test]
fn test_cli_validate_config() {
    let temp = tempdir().unwrap();
    let config_file = write_config(&temp, "[storage]\nmode = \"embedded\"\n");

    let mut cmd = artcare_cmd();
    cmd.args(["validate", arg(&config_file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Storage mode: embedded"));
}

#[test]
fn test_cli_validate_rejects_bad_profile() {
    let temp = tempdir().unwrap();
    let config_file = write_config(&temp, "[profiles.work]\nmax_dimension = 900\nquality = 2.0\n");

    let mut cmd = artcare_cmd();
    cmd.args(["validate", arg(&config_file)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quality"));
}

#[test]
fn test_cli_mode_show_and_set() {
    let temp = tempdir().unwrap();
    let config_file = write_config(&temp, "");

    artcare_cmd()
        .args(["--config", arg(&config_file), "mode"])
        .assert()
        .success()
        .stdout(predicate::str::diff("embedded\n"));

    artcare_cmd()
        .args(["--config", arg(&config_file), "mode", "external"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Storage mode set to external"))
        .stdout(predicate::str::contains("Warning"));

    let content = fs::read_to_string(&config_file).unwrap();
    assert!(content.starts_with("# test config"));
    assert!(content.contains("mode = \"external\""));

    artcare_cmd()
        .args(["--config", arg(&config_file), "mode"])
        .assert()
        .success()
        .stdout(predicate::str::diff("external\n"));
}

#[test]
fn test_cli_mode_rejects_unknown_value() {
    let temp = tempdir().unwrap();
    let config_file = write_config(&temp, "");

    artcare_cmd()
        .args(["--config", arg(&config_file), "mode", "cloud"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid storage mode"));
}

#[test]
fn test_cli_upload_embedded() {
    let temp = tempdir().unwrap();
    let config_file = write_config(&temp, "");
    let photo = temp.path().join("photo.png");
    fs::write(&photo, common::png_bytes(1200, 900)).unwrap();

    artcare_cmd()
        .args(["--config", arg(&config_file), "upload", arg(&photo), "--role", "field"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored embedded field photo"));
}

#[test]
fn test_cli_upload_external_without_backend_fails() {
    let temp = tempdir().unwrap();
    let config_file = write_config(&temp, "[storage]\nmode = \"external\"\n");
    let photo = temp.path().join("photo.png");
    fs::write(&photo, common::png_bytes(50, 50)).unwrap();

    artcare_cmd()
        .args(["--config", arg(&config_file), "upload", arg(&photo)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No backend configured"));
}

#[test]
fn test_cli_upload_nonexistent_file() {
    let temp = tempdir().unwrap();
    let config_file = write_config(&temp, "");

    artcare_cmd()
        .args(["--config", arg(&config_file), "upload", "/nonexistent/photo.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_restore_requires_confirmation() {
    let temp = tempdir().unwrap();
    let config_file = write_config(&temp, "");
    let backup = temp.path().join("backup.json");
    fs::write(&backup, SNAPSHOT).unwrap();

    artcare_cmd()
        .args(["--config", arg(&config_file), "restore", arg(&backup)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_cli_restore_export_and_usage() {
    let temp = tempdir().unwrap();
    let config_file = write_config(&temp, "");
    let backup = temp.path().join("backup.json");
    fs::write(&backup, SNAPSHOT).unwrap();

    artcare_cmd()
        .args(["--config", arg(&config_file), "restore", arg(&backup), "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore complete"))
        .stdout(predicate::str::contains("Teaching records: 1"))
        .stdout(predicate::str::contains("Participants: 1"));

    artcare_cmd()
        .args(["--config", arg(&config_file), "usage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("External: 1 work / 0 field photos"));

    let output = temp.path().join("again.json");
    artcare_cmd()
        .args(["--config", arg(&config_file), "export", "-o", arg(&output)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup written"));

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(exported["version"], "1.0");
    assert_eq!(exported["stats"]["works_count"], 1);
    assert_eq!(
        exported["data"]["teaching_participants"][0]["completion_status"],
        "complete"
    );
}

#[test]
fn test_cli_restore_invalid_snapshot() {
    let temp = tempdir().unwrap();
    let config_file = write_config(&temp, "");
    let backup = temp.path().join("backup.json");
    fs::write(&backup, r#"{"data": {"locations": []}}"#).unwrap();

    artcare_cmd()
        .args(["--config", arg(&config_file), "restore", arg(&backup), "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid snapshot"));
}

#[test]
fn test_cli_usage_json() {
    let temp = tempdir().unwrap();
    let config_file = write_config(&temp, "");

    let assert = artcare_cmd()
        .args(["--config", arg(&config_file), "usage", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["embedded"]["counts"]["work"], 0);
    assert!(report["external"]["limit_bytes"].as_u64().unwrap() > 0);
}
