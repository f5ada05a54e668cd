//! Unit tests for credential verification

use std::path::{Path, PathBuf};

use super::{AuthVerifier, IdentityProbe};
use crate::Profile;
use crate::environ::EnvironmentSet;
use crate::error::Error;
use crate::refresh::RefreshOrchestrator;

fn profile(aws: &str) -> Profile {
    Profile {
        aws: aws.into(),
        refresh: format!("okta-{aws}"),
    }
}

fn unreachable_refresher() -> RefreshOrchestrator {
    RefreshOrchestrator::new().with_program("awswitch-no-such-refresh-tool")
}

fn sh_probe(script: &str) -> IdentityProbe {
    IdentityProbe::with_command("sh", ["-c", script])
}

#[cfg(unix)]
fn write_tool(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-refresh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn disabled_verification_never_probes() {
    let verifier = AuthVerifier::new(unreachable_refresher())
        .with_probe(IdentityProbe::with_command("awswitch-no-such-probe", ["x"]));
    verifier.verify(false, &profile("dev")).await.unwrap();
}

#[tokio::test]
async fn missing_probe_binary_is_fatal() {
    let verifier = AuthVerifier::new(unreachable_refresher())
        .with_probe(IdentityProbe::with_command("awswitch-no-such-probe", ["x"]));
    let err = verifier.verify(true, &profile("dev")).await.unwrap_err();
    assert!(matches!(err, Error::MissingBinary { ref program, .. } if program == "awswitch-no-such-probe"));
}

#[cfg(unix)]
#[tokio::test]
async fn authenticated_profile_skips_refresh() {
    // The refresher cannot run, so reaching it would fail the test.
    let verifier = AuthVerifier::new(unreachable_refresher()).with_probe(sh_probe("exit 0"));
    verifier.verify(true, &profile("dev")).await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn probe_sees_overridden_profile() {
    let verifier = AuthVerifier::new(unreachable_refresher())
        .with_probe(sh_probe(r#"test "$AWS_PROFILE" = "dev""#));
    verifier.verify(true, &profile("dev")).await.unwrap();

    let err = verifier.verify(true, &profile("prod")).await.unwrap_err();
    assert!(matches!(err, Error::MissingBinary { ref program, .. } if program == "awswitch-no-such-refresh-tool"));
}

#[cfg(unix)]
#[tokio::test]
async fn probe_leaves_process_environment_untouched() {
    let before = EnvironmentSet::from_process_environment();
    let verifier = AuthVerifier::new(unreachable_refresher()).with_probe(sh_probe("exit 0"));
    verifier.verify(true, &profile("somebody-else")).await.unwrap();
    assert_eq!(EnvironmentSet::from_process_environment(), before);
}

#[cfg(unix)]
#[tokio::test]
async fn refresh_then_recheck_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let token = dir.path().join("token");
    let config = dir.path().join("okta_config");
    std::fs::write(&config, "[okta-dev]\n").unwrap();
    let tool = write_tool(dir.path(), &format!("touch '{}'", token.display()));

    let refresher = RefreshOrchestrator::new()
        .with_program(tool.to_string_lossy())
        .with_config_path(&config);
    let verifier = AuthVerifier::new(refresher)
        .with_probe(sh_probe(&format!("test -f '{}'", token.display())));

    verifier.verify(true, &profile("dev")).await.unwrap();
    assert!(token.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn still_unauthenticated_after_refresh_names_profile_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("okta_config");
    std::fs::write(&config, "[okta-dev]\n").unwrap();
    let tool = write_tool(dir.path(), "exit 0");

    let refresher = RefreshOrchestrator::new()
        .with_program(tool.to_string_lossy())
        .with_config_path(&config);
    let verifier = AuthVerifier::new(refresher)
        .with_probe(sh_probe("exit 1"))
        .with_credentials_path("/home/someone/.aws/credentials");

    let err = verifier.verify(true, &profile("dev")).await.unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated { .. }));
    let msg = err.to_string();
    assert!(msg.contains("profile dev"));
    assert!(msg.contains("/home/someone/.aws/credentials"));
}

#[cfg(unix)]
#[tokio::test]
async fn failed_refresh_is_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("okta_config");
    std::fs::write(&config, "[okta-dev]\n").unwrap();
    let tool = write_tool(dir.path(), "exit 2");

    let refresher = RefreshOrchestrator::new()
        .with_program(tool.to_string_lossy())
        .with_config_path(&config);
    let verifier = AuthVerifier::new(refresher).with_probe(sh_probe("exit 1"));

    let err = verifier.verify(true, &profile("dev")).await.unwrap_err();
    assert!(matches!(err, Error::RefreshFailed { .. }));
}
