//! Credential refresh through `gimme-aws-creds`.
//!
//! The tool is run with the terminal's stdin so it can prompt for MFA, while
//! its stdout and stderr are drained by two concurrent readers. Every line is
//! echoed back to the user; lines carrying an Okta sign-in link get that link
//! opened in the default browser.

mod scan;


use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::credentials::CredentialStore;
use crate::error::{Error, Result};
use crate::Profile;

pub use scan::{IDP_DOMAINS, login_url};

pub const REFRESH_PROGRAM: &str = "gimme-aws-creds";
pub const SSO_CONFIG_FILE: &str = ".okta_aws_login_config";

const INSTALL_HELP: &str = "https://github.com/Nike-Inc/gimme-aws-creds#installation";
const CONFIG_HELP: &str = "https://github.com/Nike-Inc/gimme-aws-creds#configuration";

/// Opens sign-in links found in refresh-tool output.
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// The platform's default URL handler.
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        open::that(url)
    }
}

/// Receives every line of refresh-tool output, tagged with its stream.
pub trait OutputSink: Send + Sync {
    fn line(&self, stream: &'static str, line: &str) -> std::io::Result<()>;
}

/// Echoes lines to this process's stdout, whichever stream they came from.
pub struct StdoutEcho;

impl OutputSink for StdoutEcho {
    fn line(&self, _stream: &'static str, line: &str) -> std::io::Result<()> {
        writeln!(std::io::stdout().lock(), "{line}")
    }
}

#[derive(Clone)]
pub struct RefreshOrchestrator {
    program: String,
    config_path: PathBuf,
    opener: Arc<dyn UrlOpener>,
    echo: Arc<dyn OutputSink>,
}

impl Default for RefreshOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshOrchestrator {
    pub fn new() -> Self {
        Self {
            program: REFRESH_PROGRAM.to_string(),
            config_path: sso_config_path(),
            opener: Arc::new(SystemBrowser),
            echo: Arc::new(StdoutEcho),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn with_opener(mut self, opener: Arc<dyn UrlOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_echo(mut self, echo: Arc<dyn OutputSink>) -> Self {
        self.echo = echo;
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Resolve the tool on PATH and make sure its config file exists.
    pub fn check_preconditions(&self) -> Result<PathBuf> {
        let binary = which::which(&self.program).map_err(|source| Error::MissingBinary {
            program: self.program.clone(),
            help: INSTALL_HELP,
            source,
        })?;
        self.require_config()?;
        Ok(binary)
    }

    /// Profile names defined in the tool's config file.
    pub fn profile_names(&self) -> Result<Vec<String>> {
        self.require_config()?;
        Ok(CredentialStore::load(&self.config_path)?.section_names())
    }

    /// Run the tool once for `profile` and wait for it to finish.
    ///
    /// Both output streams are fully drained, and any sign-in link opened,
    /// before the exit status is looked at.
    pub async fn refresh(&self, profile: &Profile) -> Result<()> {
        let binary = self.check_preconditions()?;

        tracing::info!(program = %binary.display(), profile = %profile.refresh, "starting credential refresh");
        let child = Command::new(&binary)
            .arg("--profile")
            .arg(&profile.refresh)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::RefreshSpawn {
                program: self.program.clone(),
                source,
            })?;

        let status = RefreshSession::start(child, &self.opener, &self.echo)
            .finish()
            .await
            .map_err(|source| Error::RefreshWait {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(Error::RefreshFailed {
                program: self.program.clone(),
                status,
            });
        }
        tracing::debug!("credential refresh finished");
        Ok(())
    }

    fn require_config(&self) -> Result<()> {
        if !self.config_path.exists() {
            return Err(Error::MissingConfigFile {
                path: self.config_path.clone(),
                help: CONFIG_HELP,
            });
        }
        Ok(())
    }
}

/// `~/.okta_aws_login_config`
pub fn sso_config_path() -> PathBuf {
    crate::home_dir().join(SSO_CONFIG_FILE)
}

/// A running refresh tool and the readers draining its output.
struct RefreshSession {
    child: Child,
    readers: Vec<JoinHandle<()>>,
}

impl RefreshSession {
    fn start(mut child: Child, opener: &Arc<dyn UrlOpener>, echo: &Arc<dyn OutputSink>) -> Self {
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(drain(
                "stdout",
                stdout,
                Arc::clone(opener),
                Arc::clone(echo),
            )));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(drain(
                "stderr",
                stderr,
                Arc::clone(opener),
                Arc::clone(echo),
            )));
        }
        Self { child, readers }
    }

    async fn finish(mut self) -> std::io::Result<ExitStatus> {
        for reader in self.readers {
            if let Err(e) = reader.await {
                tracing::warn!(error = %e, "output reader task failed");
            }
        }
        self.child.wait().await
    }
}

async fn drain<R>(
    stream: &'static str,
    reader: R,
    opener: Arc<dyn UrlOpener>,
    echo: Arc<dyn OutputSink>,
) where
    R: AsyncRead + Unpin,
{
    let mut segments = BufReader::new(reader).split(b'\n');
    loop {
        let segment = match segments.next_segment().await {
            Ok(Some(segment)) => segment,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(stream, error = %e, "error reading refresh output");
                let _ = writeln!(std::io::stderr(), "Error reading {stream}: {e}");
                break;
            }
        };

        let line = String::from_utf8_lossy(&segment);
        let line = line.strip_suffix('\r').unwrap_or(&line);
        // A closed stdout must not stop the scan for sign-in links.
        if let Err(e) = echo.line(stream, line) {
            tracing::warn!(stream, error = %e, "failed to echo refresh output");
        }

        if let Some(url) = login_url(line) {
            tracing::info!(stream, url, "opening sign-in url");
            if let Err(e) = opener.open(url) {
                tracing::warn!(url, error = %e, "failed to open browser");
                let _ = writeln!(
                    std::io::stderr(),
                    "  {} Failed to open URL: {e}",
                    console::style("!").yellow().bold()
                );
            }
        }
    }
}
