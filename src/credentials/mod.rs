//! The shared AWS credentials file, reduced to the profiles it names.
//!
//! Only section headers carry meaning here. Access keys and session tokens
//! are owned by the AWS tooling and the refresh tool; this module never reads
//! them back out.

mod sections;


use std::path::PathBuf;

pub use sections::{DEFAULT_SECTION, ParseError, section_names};

/// Overrides the credentials file location, as with the AWS CLI.
pub const CREDENTIALS_FILE_VAR: &str = "AWS_SHARED_CREDENTIALS_FILE";

/// One `[name]` section of a credentials file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    pub path: PathBuf,
    profiles: Vec<ProfileRecord>,
}

impl CredentialStore {
    /// Load and parse a credentials file.
    ///
    /// A missing file yields an empty store. A file that exists but cannot be
    /// parsed is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ParseError> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "credentials file not found, no profiles");
            return Ok(Self {
                path,
                profiles: Vec::new(),
            });
        }

        tracing::info!(path = %path.display(), "parsing credentials file");
        let content = std::fs::read_to_string(&path).map_err(|source| ParseError::Read {
            path: path.clone(),
            source,
        })?;

        let profiles = section_names(&path, &content)?
            .into_iter()
            .map(|name| ProfileRecord { name })
            .collect();

        Ok(Self { path, profiles })
    }

    /// Every section, in file order, including `DEFAULT`.
    pub fn section_names(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name.clone()).collect()
    }

    /// Selectable profile names, in file order, without `DEFAULT`.
    pub fn profile_names(&self) -> Vec<String> {
        self.profiles
            .iter()
            .filter(|p| p.name != DEFAULT_SECTION)
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn profile(&self, name: &str) -> Option<&ProfileRecord> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profile(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// `$AWS_SHARED_CREDENTIALS_FILE`, else `~/.aws/credentials`.
pub fn credentials_path() -> PathBuf {
    match std::env::var_os(CREDENTIALS_FILE_VAR) {
        Some(file) if !file.is_empty() => {
            let file = PathBuf::from(file);
            tracing::info!(path = %file.display(), "using {CREDENTIALS_FILE_VAR}");
            file
        }
        _ => crate::home_dir().join(".aws").join("credentials"),
    }
}
