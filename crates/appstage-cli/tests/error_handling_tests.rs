//! Tests for error handling, exit codes and suggestions.

use std::fs;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn app_with_config() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("app/public")).unwrap();
    fs::write(tmp.path().join("app/public/index.php"), "hi").unwrap();
    fs::write(tmp.path().join("appstage.toml"), "").unwrap();
    tmp
}

#[test]
fn test_error_existing_build_dir() {
    let tmp = app_with_config();
    fs::create_dir_all(tmp.path().join("build")).unwrap();

    cargo::cargo_bin_cmd!("appstage")
        .current_dir(tmp.path())
        .args(["--config", "appstage.toml", "build", "app", "--build-dir", "build"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_force_replaces_build_dir() {
    let tmp = app_with_config();
    fs::create_dir_all(tmp.path().join("build")).unwrap();
    fs::write(tmp.path().join("build/stale.txt"), "old").unwrap();

    cargo::cargo_bin_cmd!("appstage")
        .current_dir(tmp.path())
        .args([
            "--config",
            "appstage.toml",
            "build",
            "app",
            "--build-dir",
            "build",
            "--copy",
            "--force",
            "--no-web-root-link",
        ])
        .assert()
        .success();

    assert!(!tmp.path().join("build/stale.txt").exists());
    assert!(tmp.path().join("build/public/index.php").is_file());
}

#[test]
fn test_error_missing_app_root() {
    let tmp = app_with_config();

    cargo::cargo_bin_cmd!("appstage")
        .current_dir(tmp.path())
        .args(["--config", "appstage.toml", "build", "nowhere"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn test_error_missing_config_file() {
    let tmp = app_with_config();

    cargo::cargo_bin_cmd!("appstage")
        .current_dir(tmp.path())
        .args(["--config", "missing.toml", "build", "app"])
        .assert()
        .code(4);
}

#[test]
fn test_error_unknown_toolstack() {
    cargo::cargo_bin_cmd!("appstage")
        .args(["build", "--toolstack", "drupal"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("drupal"));
}

#[test]
fn test_error_unknown_config_key() {
    let tmp = app_with_config();

    cargo::cargo_bin_cmd!("appstage")
        .current_dir(tmp.path())
        .args(["--config", "appstage.toml", "config", "get", "local.nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_error_bad_bool_value() {
    let tmp = app_with_config();

    cargo::cargo_bin_cmd!("appstage")
        .current_dir(tmp.path())
        .args([
            "--config",
            "appstage.toml",
            "config",
            "set",
            "local.copy_on_windows",
            "maybe",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("true or false"));
}

#[test]
fn test_error_quiet_and_verbose_conflict() {
    cargo::cargo_bin_cmd!("appstage")
        .args(["-q", "-v", "build"])
        .assert()
        .code(2);
}
