//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// A larder command isolated to `tmp`: offline, with its own data and config dirs
pub fn larder(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("larder"));
    cmd.env_remove("LARDER_DATA_DIR")
        .env_remove("LARDER_OFFLINE")
        .env_remove("LARDER_LOG")
        .env_remove("RUST_LOG")
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("config"))
        .arg("--offline")
        .arg("--data-dir")
        .arg(tmp.path().join("data"));
    cmd
}

/// Add a stock item and return its full id
pub fn add_stock(tmp: &TempDir, name: &str, quantity: &str, unit: &str) -> String {
    let output = larder(tmp)
        .args(["stock", "add", name, "-n", quantity, "-u", unit, "-f", "id"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stock add {} failed", name);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Run a command with `-f json` and parse stdout
pub fn json(tmp: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = larder(tmp).args(args).args(["-f", "json"]).output().unwrap();
    assert!(output.status.success(), "{:?} failed", args);
    serde_json::from_slice(&output.stdout).unwrap()
}
