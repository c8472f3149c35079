//! Task-level entrypoints shared by the CLI commands.

use brewsync_core::{Sha256Hex, SyncConfig, ToolUrl};

use crate::fetch::Fetcher;
use crate::formula::{update_formula, verify_formula, PatchOutcome};
use crate::hash::compute_remote_hash;
use crate::vcs::{commit_and_push, DeployOutcome, VersionControl};
use crate::SyncError;

/// What `update-formula` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaUpdate {
    pub url: ToolUrl,
    pub hash: Sha256Hex,
    pub outcome: PatchOutcome,
    /// The formula's `sha256` line as read back after the update.
    pub hash_line: Option<String>,
}

/// What `release` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    pub update: FormulaUpdate,
    pub deploy: DeployOutcome,
}

/// Hash the remote tool script and patch it into the configured formula.
pub fn update_from_remote(
    config: &SyncConfig,
    fetcher: &dyn Fetcher,
    dry_run: bool,
) -> Result<FormulaUpdate, SyncError> {
    let url = config.tool_url()?;
    let hash = compute_remote_hash(fetcher, &url)?;
    apply_hash(config, url, hash, dry_run)
}

/// Patch a caller-supplied hash into the configured formula without fetching.
pub fn update_with_hash(
    config: &SyncConfig,
    hash: Sha256Hex,
    dry_run: bool,
) -> Result<FormulaUpdate, SyncError> {
    let url = config.tool_url()?;
    apply_hash(config, url, hash, dry_run)
}

fn apply_hash(
    config: &SyncConfig,
    url: ToolUrl,
    hash: Sha256Hex,
    dry_run: bool,
) -> Result<FormulaUpdate, SyncError> {
    let outcome = update_formula(&config.formula_file, &hash, dry_run)?;
    let hash_line = verify_formula(&config.formula_file)?;
    Ok(FormulaUpdate {
        url,
        hash,
        outcome,
        hash_line,
    })
}

/// Stage, commit and push the configured formula file.
pub fn deploy(
    config: &SyncConfig,
    vcs: &dyn VersionControl,
    message: &str,
) -> Result<DeployOutcome, SyncError> {
    commit_and_push(vcs, &config.formula_file, message)
}

/// `update-formula` followed by `deploy` with the release commit message.
pub fn release(
    config: &SyncConfig,
    fetcher: &dyn Fetcher,
    vcs: &dyn VersionControl,
) -> Result<ReleaseReport, SyncError> {
    let update = update_from_remote(config, fetcher, false)?;
    let deployed = deploy(config, vcs, &config.release_message())?;
    Ok(ReleaseReport {
        update,
        deploy: deployed,
    })
}
