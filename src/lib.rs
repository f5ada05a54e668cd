//! awswitch — run a shell or command under a chosen AWS profile

pub mod auth;
pub mod config;
pub mod credentials;
pub mod environ;
pub mod error;
pub mod launch;
pub mod refresh;

use std::path::PathBuf;

pub use auth::AuthVerifier;
pub use credentials::CredentialStore;
pub use environ::EnvironmentSet;
pub use error::{Error, Result};
pub use launch::{LaunchRequest, SubshellLauncher};
pub use refresh::RefreshOrchestrator;

/// An AWS profile and the gimme-aws-creds profile that refreshes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub aws: String,
    pub refresh: String,
}

pub(crate) fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
