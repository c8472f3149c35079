//! brewsync — keep a Homebrew formula's sha256 in sync with its tool script.
//!
//! # Usage
//!
//! ```text
//! brewsync config [--json]
//! brewsync sha-remote
//! brewsync sha-local
//! brewsync update-formula [--dry-run] [--hash SHA256]
//! brewsync deploy [message]
//! brewsync release
//! brewsync lint-justfile [--path justfile] [--fix]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use brewsync_core::{ConfigOverrides, SyncConfig, CONFIG_FILE_NAME};

use commands::{
    config::ConfigArgs, deploy::DeployArgs, lint::LintArgs, update::UpdateArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "brewsync",
    version,
    about = "Update a Homebrew formula's sha256 from its tool script and push it",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the configuration values.
    Config(ConfigArgs),

    /// Print the SHA-256 of the remote tool script.
    ShaRemote,

    /// Print the SHA-256 of the local tool script.
    ShaLocal,

    /// Patch the formula's sha256 line with the remote script hash (or --hash).
    UpdateFormula(UpdateArgs),

    /// Stage, commit and push the formula file.
    Deploy(DeployArgs),

    /// update-formula, then deploy with the release message.
    Release,

    /// Check (or fix) space-indented recipe lines in a justfile.
    LintJustfile(LintArgs),
}

// ---------------------------------------------------------------------------
// Global configuration arguments
// ---------------------------------------------------------------------------

/// Config file location plus per-value overrides; flags beat env beat file.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Config file (YAML). Defaults to ./brewsync.yaml when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GitHub account owning the tool repository.
    #[arg(long, global = true, env = "GITHUB_USER")]
    pub github_user: Option<String>,

    /// Repository holding the tool script.
    #[arg(long, global = true, env = "TOOL_REPO")]
    pub tool_repo: Option<String>,

    /// Tool script path (in the repository and locally).
    #[arg(long, global = true, env = "TOOL_SCRIPT")]
    pub tool_script: Option<String>,

    /// Formula file to patch.
    #[arg(long, global = true, env = "FORMULA_FILE", value_name = "PATH")]
    pub formula_file: Option<PathBuf>,

    /// Log progress to stderr (RUST_LOG takes precedence).
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Build the immutable config for this invocation.
    pub fn load_config(&self) -> Result<SyncConfig> {
        let base = match &self.config {
            Some(path) => SyncConfig::load(path)
                .with_context(|| format!("failed to load config '{}'", path.display()))?,
            None => SyncConfig::load_or_default(&PathBuf::from(CONFIG_FILE_NAME))
                .context("failed to load ./brewsync.yaml")?,
        };
        let config = base.with_overrides(ConfigOverrides {
            github_user: self.github_user.clone(),
            tool_repo: self.tool_repo.clone(),
            tool_script: self.tool_script.clone(),
            formula_file: self.formula_file.clone(),
        });
        tracing::debug!("effective config: {config:?}");
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let Cli { global, command } = Cli::parse();
    init_tracing(global.verbose);

    // lint-justfile is config-independent; everything else loads it first.
    let config = || global.load_config();
    match command {
        Commands::Config(args) => args.run(&config()?),
        Commands::ShaRemote => commands::sha::remote(&config()?),
        Commands::ShaLocal => commands::sha::local(&config()?),
        Commands::UpdateFormula(args) => args.run(&config()?),
        Commands::Deploy(args) => args.run(&config()?),
        Commands::Release => commands::deploy::release(&config()?),
        Commands::LintJustfile(args) => args.run(),
    }
}
