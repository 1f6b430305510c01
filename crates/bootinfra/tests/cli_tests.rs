use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const HELLO_SHA256: &str =
    "sha256:2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

fn bootinfra() -> Command {
    let mut cmd = Command::cargo_bin("bootinfra").unwrap();
    cmd.env_remove("BOOTINFRA_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let config = dir.path().join("bootinfra.toml");
    fs::write(
        &config,
        format!(
            "bosh_dir = {:?}\n\n[azure]\novf_env_path = {:?}\n",
            dir.path().display().to_string(),
            dir.path().join("ovf-env.xml").display().to_string(),
        ),
    )
    .unwrap();
    config
}

#[test]
fn test_verify_success() {
    let dir = TempDir::new().unwrap();
    let payload = dir.path().join("payload");
    fs::write(&payload, "hello").unwrap();

    bootinfra()
        .args(["verify", "--digest", HELLO_SHA256])
        .arg(&payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK (sha256:"));
}

#[test]
fn test_verify_mismatch_fails() {
    let dir = TempDir::new().unwrap();
    let payload = dir.path().join("payload");
    fs::write(&payload, "tampered").unwrap();

    bootinfra()
        .args(["verify", "--digest", HELLO_SHA256])
        .arg(&payload)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected stream to have digest"));
}

#[test]
fn test_verify_duplicate_algorithms_fail() {
    let dir = TempDir::new().unwrap();
    let payload = dir.path().join("payload");
    fs::write(&payload, "hello").unwrap();

    bootinfra()
        .args(["verify", "--digest", "sha1:abc;sha1:def"])
        .arg(&payload)
        .assert()
        .failure();
}

#[test]
fn test_platforms_lists_all() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    bootinfra()
        .arg("platforms")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("azure\tunavailable"))
        .stdout(predicate::str::contains("dummy"))
        .stdout(predicate::str::contains("warden\tavailable"));
}

#[test]
fn test_config_from_environment() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    fs::write(
        dir.path().join("dummy-cpi-agent-env.json"),
        r#"{"agent_id":"fake-agent-id"}"#,
    )
    .unwrap();

    bootinfra()
        .env("BOOTINFRA_CONFIG", &config)
        .args(["settings", "--platform", "dummy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"agent_id\": \"fake-agent-id\""));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();

    bootinfra()
        .arg("platforms")
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Reading configuration file"));
}

#[test]
fn test_unknown_platform_fails() {
    bootinfra()
        .args(["settings", "--platform", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Infrastructure nonexistent could not be found",
        ));
}

#[test]
fn test_warden_metadata_json() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    fs::write(
        dir.path().join("warden-cpi-user-data.json"),
        r#"{"server":{"name":"fake-server-name"},"registry":{"endpoint":"http://fake-registry"}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("warden-cpi-metadata.json"),
        r#"{"instance-id":"fake-instance-id"}"#,
    )
    .unwrap();

    bootinfra()
        .args(["metadata", "--platform", "warden", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"server_name\": \"fake-server-name\""))
        .stdout(predicate::str::contains("\"instance_id\": \"fake-instance-id\""));
}

#[test]
fn test_networking_dry_run_logs_actions() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    fs::write(
        dir.path().join("dummy-cpi-agent-env.json"),
        r#"{"networks":{"default":{"type":"dynamic"}}}"#,
    )
    .unwrap();

    bootinfra()
        .args(["networking", "--platform", "dummy", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("networking configured on dummy: [default]"));
}
