//! `brewsync config` — print the effective configuration.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use brewsync_core::SyncConfig;

/// Arguments for `brewsync config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ConfigJson<'a> {
    github_user: &'a str,
    tool_repo: &'a str,
    tool_script: &'a str,
    formula_file: String,
    tool_url: Option<String>,
}

impl ConfigArgs {
    pub fn run(self, config: &SyncConfig) -> Result<()> {
        // An incomplete config is still printable; the URL is simply unknown.
        let tool_url = config.tool_url().ok().map(|u| u.0);

        if self.json {
            let payload = ConfigJson {
                github_user: &config.github_user,
                tool_repo: &config.tool_repo,
                tool_script: &config.tool_script,
                formula_file: config.formula_file.display().to_string(),
                tool_url,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to render config JSON")?
            );
            return Ok(());
        }

        println!("GITHUB_USER  = {}", config.github_user);
        println!("TOOL_REPO    = {}", config.tool_repo);
        println!("TOOL_SCRIPT  = {}", config.tool_script);
        println!("FORMULA_FILE = {}", config.formula_file.display());
        println!(
            "TOOL_URL     = {}",
            tool_url.as_deref().unwrap_or("<unset: github_user required>")
        );
        Ok(())
    }
}
