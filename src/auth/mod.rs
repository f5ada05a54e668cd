//! Credential freshness checks.
//!
//! Flow:
//! 1. Resolve the `aws` CLI once up front
//! 2. Run `aws sts get-caller-identity` with AWS_PROFILE forced to the profile
//! 3. On failure, run the refresh tool once
//! 4. Probe again; give up with a pointer to the credentials file
//!
//! The probe shells out to the AWS CLI rather than reading token expiry
//! locally because gimme-aws-creds exposes no expiry of its own.

#[cfg(test)]
mod auth_tests;

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::Profile;
use crate::environ::{EnvironmentSet, PROFILE_VARS};
use crate::error::{Error, Result};
use crate::refresh::RefreshOrchestrator;

pub const PROBE_PROGRAM: &str = "aws";
const PROBE_ARGS: [&str; 2] = ["sts", "get-caller-identity"];
const AWS_CLI_HELP: &str = "https://docs.aws.amazon.com/cli/latest/userguide/getting-started-install.html";

/// A command whose exit status says whether a profile has working credentials.
#[derive(Debug, Clone)]
pub struct IdentityProbe {
    program: String,
    args: Vec<String>,
}

impl Default for IdentityProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProbe {
    pub fn new() -> Self {
        Self::with_command(PROBE_PROGRAM, PROBE_ARGS)
    }

    pub fn with_command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.program).map_err(|source| Error::MissingBinary {
            program: self.program.clone(),
            help: AWS_CLI_HELP,
            source,
        })
    }

    /// Run the probe against `profile_name`.
    ///
    /// The child gets a copy of this process's environment with the profile
    /// selector overridden; the process environment itself is left alone.
    /// Only the exit status matters, output is discarded.
    pub async fn is_authenticated(&self, binary: &Path, profile_name: &str) -> Result<bool> {
        let mut env = EnvironmentSet::from_process_environment();
        env.set(PROFILE_VARS[0], profile_name);

        let status = Command::new(binary)
            .args(&self.args)
            .env_clear()
            .envs(env.pairs())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| Error::Probe {
                program: self.program.clone(),
                source,
            })?;

        tracing::debug!(profile = profile_name, %status, "identity probe finished");
        Ok(status.success())
    }
}

pub struct AuthVerifier {
    probe: IdentityProbe,
    refresher: RefreshOrchestrator,
    credentials_path: PathBuf,
}

impl AuthVerifier {
    pub fn new(refresher: RefreshOrchestrator) -> Self {
        Self {
            probe: IdentityProbe::new(),
            refresher,
            credentials_path: crate::credentials::credentials_path(),
        }
    }

    pub fn with_probe(mut self, probe: IdentityProbe) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    /// Make sure `profile` has working credentials, refreshing them once if not.
    ///
    /// Does nothing when `enabled` is false.
    pub async fn verify(&self, enabled: bool, profile: &Profile) -> Result<()> {
        if !enabled {
            return Ok(());
        }

        let binary = self.probe.resolve()?;
        if self.probe.is_authenticated(&binary, &profile.aws).await? {
            tracing::info!(profile = %profile.aws, "credentials are valid");
            return Ok(());
        }

        tracing::info!(profile = %profile.aws, "credentials missing or expired, refreshing");
        self.refresher.refresh(profile).await?;

        if self.probe.is_authenticated(&binary, &profile.aws).await? {
            return Ok(());
        }

        Err(Error::NotAuthenticated {
            profile: profile.aws.clone(),
            credentials_path: self.credentials_path.clone(),
        })
    }
}
