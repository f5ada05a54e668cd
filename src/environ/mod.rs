//! Process environments as `KEY=VALUE` entries.

use std::ffi::{OsStr, OsString};


/// Profile selector, canonical name first.
pub const PROFILE_VARS: [&str; 2] = ["AWS_PROFILE", "AWS_DEFAULT_PROFILE"];

/// Region selector, canonical name first.
pub const REGION_VARS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];

/// Marks a shell started by awswitch.
pub const SESSION_MARKER_VAR: &str = "AWS_AXOLOTL";
pub const SESSION_MARKER_VALUE: &str = "42";

/// An ordered set of `KEY=VALUE` entries holding at most one entry per key.
///
/// Keys and values are kept as raw OS strings so variables that are not
/// valid unicode reach child processes byte for byte. This is handed to
/// child processes as their complete environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSet {
    entries: Vec<(OsString, OsString)>,
}

impl EnvironmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    pub fn from_process_environment() -> Self {
        std::env::vars_os().collect()
    }

    /// Replace any entry for `key` with `key=value`.
    pub fn set(&mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) {
        let key = key.as_ref();
        self.unset(key);
        self.entries
            .push((key.to_os_string(), value.as_ref().to_os_string()));
    }

    /// Remove the entry for `key`, if there is one.
    pub fn unset(&mut self, key: impl AsRef<OsStr>) {
        if let Some(idx) = self.position(key.as_ref()) {
            self.entries.swap_remove(idx);
        }
    }

    /// Set every alias in `names` to the same value.
    pub fn set_all(&mut self, names: &[&str], value: &str) {
        for name in names {
            self.set(name, value);
        }
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.position(key.as_ref())
            .map(|idx| self.entries[idx].1.as_os_str())
    }

    pub fn contains(&self, key: impl AsRef<OsStr>) -> bool {
        self.position(key.as_ref()).is_some()
    }

    /// Entries rendered as `KEY=VALUE`, in their current order.
    pub fn entries(&self) -> Vec<OsString> {
        self.entries
            .iter()
            .map(|(key, value)| {
                let mut entry = OsString::with_capacity(key.len() + value.len() + 1);
                entry.push(key);
                entry.push("=");
                entry.push(value);
                entry
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries as `(key, value)`, for `Command::envs`.
    pub fn pairs(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_os_str(), value.as_os_str()))
    }

    // OsStr equality compares the encoded bytes.
    fn position(&self, key: &OsStr) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.as_os_str() == key)
    }
}

impl<K: AsRef<OsStr>, V: AsRef<OsStr>> FromIterator<(K, V)> for EnvironmentSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (key, value) in iter {
            env.set(key, value);
        }
        env
    }
}
