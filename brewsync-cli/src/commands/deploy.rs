//! `brewsync deploy [message]` and `brewsync release`.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use brewsync_core::SyncConfig;
use brewsync_sync::{pipeline, DeployOutcome, GitCli, HttpFetcher};

use super::update::print_update;

/// Arguments for `brewsync deploy`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Commit message. Defaults to "Update <tool_repo> formula".
    pub message: Option<String>,
}

impl DeployArgs {
    pub fn run(self, config: &SyncConfig) -> Result<()> {
        let message = self.message.unwrap_or_else(|| config.deploy_message());
        let outcome = pipeline::deploy(config, &git_for(config), &message)
            .with_context(|| format!("deploy failed for '{}'", config.formula_file.display()))?;
        print_deploy(config, &outcome, &message);
        Ok(())
    }
}

pub fn release(config: &SyncConfig) -> Result<()> {
    let report = pipeline::release(config, &HttpFetcher::new(), &git_for(config))
        .context("release failed")?;
    print_update(config, &report.update);
    print_deploy(config, &report.deploy, &config.release_message());
    Ok(())
}

/// git client rooted at the working directory, the same place formula paths resolve from.
fn git_for(config: &SyncConfig) -> GitCli {
    GitCli::new(Path::new("."), config.git_remote.clone())
}

fn print_deploy(config: &SyncConfig, outcome: &DeployOutcome, message: &str) {
    let formula = config.formula_file.display();
    match outcome {
        DeployOutcome::NothingToCommit => {
            println!("{} {formula}: nothing to commit", "·".bright_black());
        }
        DeployOutcome::Pushed => {
            println!("{} committed and pushed {formula}: {message}", "✓".green().bold());
        }
    }
}
