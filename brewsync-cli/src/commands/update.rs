//! `brewsync update-formula` — patch the formula with the remote script hash.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use brewsync_core::{Sha256Hex, SyncConfig};
use brewsync_sync::{
    pipeline::{self, FormulaUpdate},
    HttpFetcher, PatchOutcome,
};

/// Arguments for `brewsync update-formula`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Show the change as a unified diff without writing the formula.
    #[arg(long)]
    pub dry_run: bool,

    /// Use this SHA-256 instead of downloading the tool script.
    #[arg(long, value_name = "SHA256")]
    pub hash: Option<Sha256Hex>,
}

impl UpdateArgs {
    pub fn run(self, config: &SyncConfig) -> Result<()> {
        let update = match self.hash {
            Some(hash) => pipeline::update_with_hash(config, hash, self.dry_run),
            None => pipeline::update_from_remote(config, &HttpFetcher::new(), self.dry_run),
        }
        .with_context(|| {
            format!(
                "update-formula failed for '{}'",
                config.formula_file.display()
            )
        })?;
        print_update(config, &update);
        Ok(())
    }
}

/// Shared with `release`.
pub(crate) fn print_update(config: &SyncConfig, update: &FormulaUpdate) {
    let formula = config.formula_file.display();
    println!("sha256: {}", update.hash);
    match &update.outcome {
        PatchOutcome::Updated { previous } => {
            println!(
                "{} {formula} updated ({} → {})",
                "✓".green().bold(),
                previous,
                update.hash
            );
        }
        PatchOutcome::Unchanged => {
            println!("{} {formula} already up to date", "·".bright_black());
        }
        PatchOutcome::WouldUpdate { diff, .. } => {
            println!("[dry-run] {formula} would change:");
            print!("{diff}");
            if !diff.ends_with('\n') {
                println!();
            }
            return;
        }
    }
    if let Some(line) = &update.hash_line {
        println!("{line}");
    }
}
