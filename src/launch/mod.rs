//! Replace awswitch with the requested command inside the profile environment.


use std::convert::Infallible;
use std::path::{Path, PathBuf};

use crate::Profile;
use crate::auth::AuthVerifier;
use crate::environ::{
    EnvironmentSet, PROFILE_VARS, REGION_VARS, SESSION_MARKER_VALUE, SESSION_MARKER_VAR,
};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub command: String,
    pub args: Vec<String>,
    pub profile: Profile,
    pub region: String,
    pub verify: bool,
}

pub struct SubshellLauncher {
    inherited: EnvironmentSet,
}

impl Default for SubshellLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl SubshellLauncher {
    pub fn new() -> Self {
        Self::with_environment(EnvironmentSet::from_process_environment())
    }

    /// Launch from `inherited` instead of this process's environment.
    pub fn with_environment(inherited: EnvironmentSet) -> Self {
        Self { inherited }
    }

    /// Fail if the inherited environment already belongs to an awswitch
    /// session; nesting has to be forced by unsetting the marker.
    pub fn check_not_nested(&self) -> Result<()> {
        if self.inherited.contains(SESSION_MARKER_VAR) {
            return Err(Error::NestedSession {
                var: SESSION_MARKER_VAR,
            });
        }
        Ok(())
    }

    /// The child environment: inherited variables plus profile, region and
    /// session marker.
    ///
    /// Refuses to build one inside another awswitch session.
    pub fn build_environment(&self, profile_name: &str, region: &str) -> Result<EnvironmentSet> {
        self.check_not_nested()?;

        let mut env = self.inherited.clone();
        env.set_all(&PROFILE_VARS, profile_name);
        env.set_all(&REGION_VARS, region);
        env.set(SESSION_MARKER_VAR, SESSION_MARKER_VALUE);
        Ok(env)
    }

    /// Verify credentials, then exec the command.
    ///
    /// Never returns on success: the command takes over this process.
    pub async fn launch(&self, request: &LaunchRequest, verifier: &AuthVerifier) -> Result<Infallible> {
        let env = self.build_environment(&request.profile.aws, &request.region)?;

        verifier.verify(request.verify, &request.profile).await?;

        let path = which::which(&request.command).map_err(|source| Error::CommandNotFound {
            command: request.command.clone(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            profile = %request.profile.aws,
            region = %request.region,
            "replacing process"
        );
        Err(replace_process(&path, &request.command, &request.args, &env))
    }
}

#[cfg(unix)]
fn replace_process(path: &Path, argv0: &str, args: &[String], env: &EnvironmentSet) -> Error {
    use std::os::unix::process::CommandExt;

    let source = std::process::Command::new(path)
        .arg0(argv0)
        .args(args)
        .env_clear()
        .envs(env.pairs())
        .exec();
    Error::ExecFailed {
        path: PathBuf::from(path),
        source,
    }
}

// No exec(2) here; run the command as a child and mirror its exit code.
#[cfg(not(unix))]
fn replace_process(path: &Path, _argv0: &str, args: &[String], env: &EnvironmentSet) -> Error {
    let status = std::process::Command::new(path)
        .args(args)
        .env_clear()
        .envs(env.pairs())
        .status();
    match status {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(source) => Error::ExecFailed {
            path: PathBuf::from(path),
            source,
        },
    }
}
