use std::path::PathBuf;
use std::process::ExitStatus;

use crate::credentials::ParseError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Preconditions: fatal, reported immediately.
    #[error("unable to locate `{program}` in PATH, please install it: {source}\n\n\t{help}")]
    MissingBinary {
        program: String,
        help: &'static str,
        #[source]
        source: which::Error,
    },

    #[error("unable to locate {}, please create it\n\n\t{help}", path.display())]
    MissingConfigFile { path: PathBuf, help: &'static str },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(
        "unable to authenticate to AWS with profile {profile}. Check {} to ensure this profile exists",
        credentials_path.display()
    )]
    NotAuthenticated {
        profile: String,
        credentials_path: PathBuf,
    },

    #[error("unable to run `{program}`: {source}")]
    Probe {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to start `{program}`: {source}")]
    RefreshSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error executing `{program}`: {status}")]
    RefreshFailed { program: String, status: ExitStatus },

    #[error("error waiting for `{program}`: {source}")]
    RefreshWait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("awswitch sessions should be nested with care, unset {var} to force")]
    NestedSession { var: &'static str },

    #[error("no command given and $SHELL is not set")]
    NoCommand,

    #[error("couldn't find the executable '{command}': {source}")]
    CommandNotFound {
        command: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to execute '{}': {source}", path.display())]
    ExecFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
