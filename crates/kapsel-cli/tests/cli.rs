//! End-to-end tests for the `kapsel` binary.
//!
//! Each test writes a descriptor into a temp directory and drives the CLI
//! against it. Signing credentials are injected per-command through the
//! child process environment.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const KEY_PASSWORD_VAR: &str = "KAPSEL_TEST_KEY_PASSWORD";
const STORE_PASSWORD_VAR: &str = "KAPSEL_TEST_STORE_PASSWORD";

fn kapsel_cmd() -> Command {
    let mut cmd = Command::cargo_bin("kapsel").unwrap();
    cmd.env(KEY_PASSWORD_VAR, "key-pass");
    cmd.env(STORE_PASSWORD_VAR, "store-pass");
    cmd
}

fn write_descriptor(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("kapsel.toml");
    fs::write(&path, body).unwrap();
    path
}

fn valid_descriptor() -> String {
    format!(
        r#"
[application]
id = "com.example.app"
version-code = 7
version-name = "1.2.3"

[sdk]
min = 24
target = 34
compile = 34

[java]
core-library-desugaring = true

[signing.upload]
key-alias = "upload"
key-password-env = "{KEY_PASSWORD_VAR}"
store-file = "keys/upload.jks"
store-password-env = "{STORE_PASSWORD_VAR}"

[variant.debug]
signing-config = "upload"

[variant.release]
signing-config = "upload"

[[dependencies]]
coordinate = "com.android.tools:desugar_jdk_libs:2.1.5"
purpose = "core-library-desugaring"
"#
    )
}

// ==================== VALIDATE ====================

#[test]
fn validate_accepts_valid_descriptor() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, &valid_descriptor());

    kapsel_cmd()
        .args(["validate", "--descriptor"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"))
        .stdout(predicate::str::contains("com.example.app"));
}

#[test]
fn validate_reports_version_ordering() {
    let dir = TempDir::new().unwrap();
    let body = valid_descriptor().replace("target = 34", "target = 21");
    let path = write_descriptor(&dir, &body);

    kapsel_cmd()
        .args(["validate", "--descriptor"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sdk.min"));
}

#[test]
fn validate_fails_when_credentials_are_unset() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, &valid_descriptor());

    Command::cargo_bin("kapsel")
        .unwrap()
        .env_remove(KEY_PASSWORD_VAR)
        .env_remove(STORE_PASSWORD_VAR)
        .args(["validate", "--descriptor"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not set"));
}

#[test]
fn validate_fails_on_missing_file() {
    let dir = TempDir::new().unwrap();

    kapsel_cmd()
        .args(["validate", "--descriptor"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// ==================== SHOW ====================

#[test]
fn show_text_lists_dotted_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, &valid_descriptor());

    kapsel_cmd()
        .args(["show", "--descriptor"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("application.id = com.example.app"))
        .stdout(predicate::str::contains("sdk.compile = 34"));
}

#[test]
fn show_json_redacts_credentials() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, &valid_descriptor());

    kapsel_cmd()
        .args(["show", "--format", "json", "--descriptor"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"com.example.app\""))
        .stdout(predicate::str::contains("<redacted>"))
        .stdout(predicate::str::contains("store-pass").not());
}

// ==================== GET ====================

#[test]
fn get_reads_a_single_field() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, &valid_descriptor());

    kapsel_cmd()
        .args(["get", "sdk.min", "--descriptor"])
        .arg(&path)
        .assert()
        .success()
        .stdout("24\n");
}

#[test]
fn get_unknown_field_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, &valid_descriptor());

    kapsel_cmd()
        .args(["get", "sdk.maximum", "--descriptor"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no field"));
}

// ==================== INIT ====================

#[test]
fn init_writes_a_loadable_descriptor() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kapsel.toml");

    kapsel_cmd()
        .args(["init", "--id", "io.kapsel.demo", "--descriptor"])
        .arg(&path)
        .assert()
        .success();

    let body = fs::read_to_string(&path).unwrap();
    assert!(body.contains("id = \"io.kapsel.demo\""));

    kapsel_cmd()
        .env("KAPSEL_UPLOAD_KEY_PASSWORD", "key-pass")
        .env("KAPSEL_UPLOAD_STORE_PASSWORD", "store-pass")
        .args(["validate", "--descriptor"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn init_rejects_malformed_application_id() {
    let dir = TempDir::new().unwrap();

    kapsel_cmd()
        .args(["init", "--id", "not-reverse-dns", "--descriptor"])
        .arg(dir.path().join("kapsel.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("reverse-DNS"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, &valid_descriptor());

    kapsel_cmd()
        .args(["init", "--descriptor"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    kapsel_cmd()
        .args(["init", "--force", "--descriptor"])
        .arg(&path)
        .assert()
        .success();
}
