//! Integration tests for the imirunner binary.
//!
//! These tests never reach a cloud provider: they cover argument parsing,
//! settings loading, and validation that happens before any remote action.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const SETTINGS: &str = "\
aws:
  region: us-east-1
  launch_template_id: lt-0abc
paths:
  ssh_key: /nonexistent/imikey.pem
  local_data: /nonexistent/data
region:
  shapefile: permian
  state_vector: StateVector.nc
";

fn imirunner() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("imirunner"));
    cmd.env("NO_COLOR", "1")
        .env_remove("IMIRUNNER_CONFIG")
        .env_remove("IMIRUNNER_LOG");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

/// A command whose `PATH` is empty, so any attempt to run `aws` or `ssh`
/// fails with a spawn error instead of reaching the network.
fn offline(dir: &Path) -> Command {
    let settings = write(dir, "settings.yml", SETTINGS);
    let mut cmd = imirunner();
    cmd.env("PATH", dir).arg("--config").arg(settings);
    cmd
}

// --- Help and version ---

#[test]
fn test_cli_no_args_shows_help() {
    imirunner().assert().code(2).stderr(
        predicate::str::contains("Run methane inversions")
            .or(predicate::str::contains("requires a subcommand")),
    );
}

#[test]
fn test_cli_help_lists_commands() {
    let output = imirunner().arg("--help").output().expect("run imirunner");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in [
        "create",
        "terminate",
        "stop",
        "restart",
        "cancel-spot",
        "setup",
        "run",
        "log",
        "shell",
        "copy-local",
        "copy-from-s3",
        "list",
    ] {
        assert!(
            stdout.contains(command),
            "help is missing {command}:\n{stdout}"
        );
    }
}

#[test]
fn test_cli_version_flag_shows_version() {
    imirunner()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("imirunner"));
}

#[test]
fn test_run_help_documents_tmux() {
    imirunner()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--tmux"))
        .stdout(predicate::str::contains("--instance"));
}

// --- Settings ---

#[test]
fn test_missing_settings_file_fails() {
    imirunner()
        .args(["--config", "/nonexistent/settings.yml", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read settings file"));
}

#[test]
fn test_incomplete_settings_name_the_missing_key() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = write(
        dir.path(),
        "settings.yml",
        &SETTINGS.replace("  region: us-east-1\n", "  region: ''\n"),
    );
    imirunner()
        .arg("--config")
        .arg(settings)
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("aws.region"));
}

#[test]
fn test_no_color_env_with_any_value_is_accepted() {
    for value in ["1", "true", "yes"] {
        imirunner()
            .env("NO_COLOR", value)
            .args(["--config", "/nonexistent/settings.yml", "list"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("cannot read settings file"));
    }
}

// --- Job validation happens before any remote action ---

#[test]
fn test_run_reads_job_config_not_settings_from_positional() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "settings.yml", SETTINGS);
    write(dir.path(), "run1.yml", "RunName: run2\nUseSlurm: true\n");
    imirunner()
        .current_dir(dir.path())
        .env("PATH", dir.path())
        .args(["run", "run1.yml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not match RunName"))
        .stderr(predicate::str::contains("cannot parse").not());
}

#[test]
fn test_run_name_mismatch_fails_before_listing_instances() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write(dir.path(), "run1.yml", "RunName: run2\nUseSlurm: true\n");
    offline(dir.path())
        .arg("run")
        .arg(config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not match RunName"))
        .stderr(predicate::str::contains("failed to spawn").not());
}

#[test]
fn test_slurm_config_with_tmux_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write(dir.path(), "run1.yml", "RunName: run1\nUseSlurm: true\n");
    offline(dir.path())
        .arg("run")
        .arg(config)
        .arg("--tmux")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be used with --tmux"));
}

#[test]
fn test_interactive_config_without_tmux_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write(dir.path(), "run1.yml", "RunName: run1\nUseSlurm: false\n");
    offline(dir.path())
        .arg("run")
        .arg(config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("requires the --tmux option"));
}

#[test]
fn test_invalid_launch_options_fail_before_launch() {
    let dir = tempfile::tempdir().expect("tempdir");
    offline(dir.path())
        .args(["create", "--options", "{not json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Example valid format"));
}

#[test]
fn test_valid_config_proceeds_to_instance_listing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write(dir.path(), "run1.yml", "RunName: run1\nUseSlurm: true\n");
    offline(dir.path())
        .arg("run")
        .arg(config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to spawn aws"));
}
