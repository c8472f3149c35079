//! `brewsync lint-justfile` — recipe lines must be tab-indented.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use brewsync_sync::justfile::{check_justfile, fix_justfile};

/// Arguments for `brewsync lint-justfile`.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Justfile to check.
    #[arg(long, default_value = "justfile")]
    pub path: PathBuf,

    /// Rewrite leading spaces as a single tab instead of failing.
    #[arg(long)]
    pub fix: bool,
}

impl LintArgs {
    pub fn run(self) -> Result<()> {
        if self.fix {
            let changed = fix_justfile(&self.path)
                .with_context(|| format!("failed to fix '{}'", self.path.display()))?;
            if changed {
                println!(
                    "{} fixed leading spaces in {}",
                    "✓".green().bold(),
                    self.path.display()
                );
            }
        }

        let violations = check_justfile(&self.path)
            .with_context(|| format!("failed to read '{}'", self.path.display()))?;
        if violations.is_empty() {
            return Ok(());
        }

        eprintln!(
            "{} {} contains lines with leading spaces (just requires tabs for recipe bodies):",
            "error:".red().bold(),
            self.path.display()
        );
        for v in &violations {
            eprintln!("  line {}: {:?}", v.line, v.content);
        }
        eprintln!("Fix: run `brewsync lint-justfile --fix`.");
        bail!("{} space-indented line(s)", violations.len());
    }
}
