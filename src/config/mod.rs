//! User settings persisted between runs.
//!
//! Stored at `~/.config/awswitch/config.json`, created with defaults on first
//! use.


use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Region used when neither `--region` nor a configured default is set.
pub const FALLBACK_REGION: &str = "us-east-1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Verify credentials (and refresh them) before launching.
    pub auto_gimme_aws_creds: bool,
    pub default_region: String,
    /// AWS profile name -> gimme-aws-creds profile name.
    pub profiles: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_gimme_aws_creds: true,
            default_region: String::new(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn region(&self) -> &str {
        if self.default_region.is_empty() {
            FALLBACK_REGION
        } else {
            &self.default_region
        }
    }
}

pub fn config_dir() -> PathBuf {
    crate::home_dir().join(".config").join("awswitch")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load the config at `path`, writing defaults there if it does not exist.
pub fn load_or_init(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        let config = Config::default();
        save(path, &config)?;
        tracing::info!(path = %path.display(), "created default config");
        return Ok(config);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn save(path: &Path, config: &Config) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("error creating config directory {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("error writing config file {}", path.display()))
}
