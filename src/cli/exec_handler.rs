//! CLI handler for launching a command under a profile.

use std::cell::OnceCell;
use std::path::PathBuf;

use anyhow::Context;
use awswitch::config::{self, Config};
use awswitch::credentials::credentials_path;
use awswitch::{
    AuthVerifier, CredentialStore, Error, LaunchRequest, Profile, RefreshOrchestrator,
    SubshellLauncher,
};

use super::ExecArgs;
use super::prompt;

/// State shared by the steps of one invocation.
pub(super) struct Session {
    config_path: PathBuf,
    config: Config,
    credentials_path: PathBuf,
    credentials: OnceCell<CredentialStore>,
    refresher: RefreshOrchestrator,
}

impl Session {
    fn load() -> anyhow::Result<Self> {
        Self::open(config::config_path(), credentials_path())
    }

    pub(super) fn open(config_path: PathBuf, credentials_path: PathBuf) -> anyhow::Result<Self> {
        let config = config::load_or_init(&config_path)?;
        Ok(Self {
            config_path,
            config,
            credentials_path,
            credentials: OnceCell::new(),
            refresher: RefreshOrchestrator::new(),
        })
    }

    /// The credentials file, parsed on first use.
    pub(super) fn credentials(&self) -> anyhow::Result<&CredentialStore> {
        if let Some(store) = self.credentials.get() {
            return Ok(store);
        }
        tracing::info!(path = %self.credentials_path.display(), "loading credentials file");
        let store = CredentialStore::load(&self.credentials_path)
            .context("error loading AWS credentials")?;
        Ok(self.credentials.get_or_init(|| store))
    }

    fn aws_profile(&self, requested: Option<String>) -> anyhow::Result<String> {
        let name = match requested {
            Some(name) => name,
            None => prompt::select(
                "Please select AWS profile.",
                &self.credentials()?.profile_names(),
            )?,
        };

        let store = self.credentials()?;
        if !store.is_empty() && !store.contains(&name) {
            tracing::warn!(
                profile = %name,
                path = %store.path.display(),
                "profile not found in credentials file"
            );
        }
        Ok(name)
    }

    /// gimme-aws-creds profile for `aws`, asked for once and then remembered.
    fn refresh_profile(&mut self, aws: &str) -> anyhow::Result<String> {
        if let Some(name) = self.config.profiles.get(aws) {
            return Ok(name.clone());
        }

        let mut names = self.refresher.profile_names()?;
        let name = if names.len() == 1 {
            names.remove(0)
        } else {
            prompt::select("Please select gimme-aws-creds profile.", &names)?
        };

        self.config.profiles.insert(aws.to_string(), name.clone());
        config::save(&self.config_path, &self.config)?;
        tracing::info!(aws, refresh = %name, "saved profile mapping");
        Ok(name)
    }
}

pub async fn run(args: ExecArgs) -> anyhow::Result<()> {
    let launcher = SubshellLauncher::new();
    launcher.check_not_nested()?;

    let mut session = Session::load()?;
    let verify = session.config.auto_gimme_aws_creds;

    let aws = session.aws_profile(args.profile)?;
    let refresh = if verify {
        session.refresh_profile(&aws)?
    } else {
        session.config.profiles.get(&aws).cloned().unwrap_or_default()
    };

    let command = match args.cmd {
        Some(cmd) => cmd,
        None => std::env::var("SHELL")
            .ok()
            .filter(|shell| !shell.trim().is_empty())
            .ok_or(Error::NoCommand)?,
    };

    let request = LaunchRequest {
        command,
        args: args.args,
        profile: Profile { aws, refresh },
        region: args
            .region
            .unwrap_or_else(|| session.config.region().to_string()),
        verify,
    };

    let verifier = AuthVerifier::new(session.refresher);
    match launcher.launch(&request, &verifier).await {
        Ok(never) => match never {},
        Err(e) => Err(e.into()),
    }
}
