//! Integration tests for the tfexport CLI
//!
//! These drive the built binary; nothing here reaches the network.

use std::process::{Command, Output};
use tempfile::TempDir;

fn run_tfexport(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tfexport"))
        .args(args)
        .env_remove("AKAMAI_HOST")
        .env_remove("AKAMAI_CLIENT_TOKEN")
        .env_remove("AKAMAI_CLIENT_SECRET")
        .env_remove("AKAMAI_ACCESS_TOKEN")
        .env_remove("EDGERC")
        .env_remove("EDGERC_SECTION")
        .output()
        .expect("Failed to execute tfexport")
}

#[test]
fn test_tfexport_version() {
    let output = run_tfexport(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tfexport"));
}

#[test]
fn test_tfexport_help() {
    let output = run_tfexport(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    for command in [
        "export-cloudlets-policy",
        "export-zone",
        "export-appsec",
        "export-domain",
        "export-property",
    ] {
        assert!(stdout.contains(command), "{} missing from help", command);
    }
    assert!(stdout.contains("--edgerc"));
    assert!(stdout.contains("--section"));
}

#[test]
fn test_export_zone_help() {
    let output = run_tfexport(&["export-zone", "--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--tfworkpath"));
    assert!(stdout.contains("--skip-imported"));
}

#[test]
fn test_missing_name_is_usage_error() {
    let output = run_tfexport(&["export-cloudlets-policy"]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage:"));
}

#[test]
fn test_unknown_subcommand() {
    let output = run_tfexport(&["export-everything"]);

    assert!(!output.status.success());
}

#[test]
fn test_unreadable_edgerc_exits_with_general_error() {
    let work = TempDir::new().unwrap();
    let edgerc = work.path().join("missing.edgerc");

    let output = run_tfexport(&[
        "--edgerc",
        edgerc.to_str().unwrap(),
        "export-property",
        "www.example.com",
        "--tfworkpath",
        work.path().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("edgerc"));
    assert!(!work.path().join("property.tf").exists());
}

#[test]
fn test_section_missing_from_edgerc() {
    let work = TempDir::new().unwrap();
    let edgerc = work.path().join(".edgerc");
    std::fs::write(
        &edgerc,
        "[default]\nhost = akab-h.luna.akamaiapis.net\nclient_token = ct\nclient_secret = cs\naccess_token = at\n",
    )
    .unwrap();

    let output = run_tfexport(&[
        "--edgerc",
        edgerc.to_str().unwrap(),
        "--section",
        "other",
        "export-domain",
        "example.akadns.net",
        "--tfworkpath",
        work.path().to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("other"));
}
