//! CLI integration tests
//!
//! Tests:
//! - awswitch --help → exit 0
//! - settings flags write ~/.config/awswitch/config.json
//! - nested sessions are refused
//! - the launched command sees the profile environment
//! - credentials file and PATH failures are reported

use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;

/// Get the binary command with a throwaway HOME and no inherited session
fn awswitch(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("awswitch").unwrap();
    cmd.env("HOME", home)
        .env_remove("AWS_AXOLOTL")
        .env_remove("AWS_SHARED_CREDENTIALS_FILE")
        .env_remove("RUST_LOG");
    cmd
}

fn disable_verify(home: &Path) {
    awswitch(home).arg("--no-verify").assert().success();
}

#[test]
fn help_returns_exit_0() {
    let temp = tempfile::tempdir().unwrap();
    awswitch(temp.path()).arg("--help").assert().success();
}

#[test]
fn no_verify_is_persisted() {
    let temp = tempfile::tempdir().unwrap();

    awswitch(temp.path())
        .arg("--no-verify")
        .assert()
        .success()
        .stdout(contains("Disabled automatic credentials"));

    let raw = fs::read_to_string(temp.path().join(".config/awswitch/config.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["autoGimmeAwsCreds"], false);
}

#[test]
fn verify_re_enables() {
    let temp = tempfile::tempdir().unwrap();
    disable_verify(temp.path());

    awswitch(temp.path())
        .arg("--verify")
        .assert()
        .success()
        .stdout(contains("Enabled automatic credentials"));

    let raw = fs::read_to_string(temp.path().join(".config/awswitch/config.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["autoGimmeAwsCreds"], true);
}

#[test]
fn default_region_is_persisted_and_used() {
    let temp = tempfile::tempdir().unwrap();
    disable_verify(temp.path());

    awswitch(temp.path())
        .args(["--default-region", "eu-west-1"])
        .assert()
        .success()
        .stdout(contains("Set default region to eu-west-1"));

    awswitch(temp.path())
        .args(["-p", "dev", "--", "sh", "-c", "echo $AWS_REGION"])
        .assert()
        .success()
        .stdout("eu-west-1\n");
}

#[test]
fn nested_session_is_refused() {
    let temp = tempfile::tempdir().unwrap();
    disable_verify(temp.path());

    awswitch(temp.path())
        .env("AWS_AXOLOTL", "42")
        .args(["-p", "dev", "--", "sh", "-c", "echo should-not-run"])
        .assert()
        .failure()
        .stdout(predicates::str::is_empty())
        .stderr(contains("unset AWS_AXOLOTL to force"));
}

#[test]
fn launched_command_sees_profile() {
    let temp = tempfile::tempdir().unwrap();
    disable_verify(temp.path());

    awswitch(temp.path())
        .args(["-p", "dev", "-r", "us-east-1", "--", "sh", "-c", "echo $AWS_PROFILE"])
        .assert()
        .success()
        .stdout("dev\n");
}

#[test]
fn launched_command_sees_aliases_and_marker() {
    let temp = tempfile::tempdir().unwrap();
    disable_verify(temp.path());

    awswitch(temp.path())
        .env("AWS_PROFILE", "stale")
        .args([
            "-p",
            "dev",
            "-r",
            "us-east-1",
            "--",
            "sh",
            "-c",
            "echo $AWS_DEFAULT_PROFILE $AWS_REGION $AWS_DEFAULT_REGION $AWS_AXOLOTL",
        ])
        .assert()
        .success()
        .stdout("dev us-east-1 us-east-1 42\n");
}

#[test]
fn shell_is_the_default_command() {
    let temp = tempfile::tempdir().unwrap();
    disable_verify(temp.path());

    awswitch(temp.path())
        .env("SHELL", "sh")
        .args(["-p", "dev"])
        .write_stdin("echo \"$AWS_PROFILE\"\n")
        .assert()
        .success()
        .stdout("dev\n");
}

#[test]
fn missing_shell_without_command_fails() {
    let temp = tempfile::tempdir().unwrap();
    disable_verify(temp.path());

    awswitch(temp.path())
        .env_remove("SHELL")
        .args(["-p", "dev"])
        .assert()
        .failure()
        .stderr(contains("no command given"));
}

#[test]
fn unknown_command_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    disable_verify(temp.path());

    awswitch(temp.path())
        .args(["-p", "dev", "--", "awswitch-no-such-command"])
        .assert()
        .failure()
        .stderr(contains("couldn't find the executable 'awswitch-no-such-command'"));
}

#[test]
fn malformed_credentials_file_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    disable_verify(temp.path());
    let creds = temp.path().join("credentials");
    fs::write(&creds, "[dev]\n[broken\n").unwrap();

    awswitch(temp.path())
        .env("AWS_SHARED_CREDENTIALS_FILE", &creds)
        .args(["-p", "dev", "--", "sh", "-c", "echo should-not-run"])
        .assert()
        .failure()
        .stdout(predicates::str::is_empty())
        .stderr(contains("unterminated section header"));
}

#[test]
fn verification_requires_aws_cli() {
    let temp = tempfile::tempdir().unwrap();
    let empty_path = temp.path().join("bin");
    fs::create_dir_all(&empty_path).unwrap();
    fs::create_dir_all(temp.path().join(".config/awswitch")).unwrap();
    fs::write(
        temp.path().join(".config/awswitch/config.json"),
        r#"{"autoGimmeAwsCreds":true,"profiles":{"dev":"okta-dev"}}"#,
    )
    .unwrap();

    awswitch(temp.path())
        .env("PATH", &empty_path)
        .args(["-p", "dev", "--", "sh"])
        .assert()
        .failure()
        .stderr(contains("unable to locate `aws` in PATH"));
}

#[cfg(unix)]
#[test]
fn non_unicode_variables_reach_the_command_unchanged() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = tempfile::tempdir().unwrap();
    disable_verify(temp.path());

    awswitch(temp.path())
        .env("AWSWITCH_RAW", OsStr::from_bytes(b"a\xffb"))
        .args([
            "-p",
            "dev",
            "--",
            "sh",
            "-c",
            "printf %s \"$AWSWITCH_RAW\" | od -An -tx1",
        ])
        .assert()
        .success()
        .stdout(contains("61 ff 62"));
}
