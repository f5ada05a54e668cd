pub mod exec_handler;
pub mod prompt;
pub mod settings_handler;


use clap::{Args, Parser};

/// awswitch CLI
#[derive(Parser)]
#[command(
    name = "awswitch",
    version,
    about = "A helper utility for switching AWS profiles in subshells."
)]
pub struct Cli {
    /// Show debugging output
    #[arg(long)]
    pub debug: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub exec: ExecArgs,
}

/// Flags that update the saved config and exit.
#[derive(Args)]
pub struct SettingsArgs {
    /// Enable automatic credentials with `gimme-aws-creds`
    #[arg(long, conflicts_with = "no_verify")]
    pub verify: bool,

    /// Disable automatic credentials with `gimme-aws-creds`
    #[arg(long)]
    pub no_verify: bool,

    /// Set default AWS region
    #[arg(long, value_name = "REGION")]
    pub default_region: Option<String>,
}

impl SettingsArgs {
    pub fn is_set(&self) -> bool {
        self.verify || self.no_verify || self.default_region.is_some()
    }
}

#[derive(Args)]
pub struct ExecArgs {
    /// The AWS profile to execute as
    #[arg(short, long)]
    pub profile: Option<String>,

    /// The AWS region to execute to (default: configured default region)
    #[arg(short, long)]
    pub region: Option<String>,

    /// The command to run, defaults to $SHELL
    pub cmd: Option<String>,

    /// The arguments to pass to the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
