//! `brewsync sha-remote` / `brewsync sha-local` — print a script's SHA-256.

use anyhow::{Context, Result};

use brewsync_core::SyncConfig;
use brewsync_sync::{compute_local_hash, compute_remote_hash, HttpFetcher};

pub fn remote(config: &SyncConfig) -> Result<()> {
    let url = config.tool_url()?;
    let hash = compute_remote_hash(&HttpFetcher::new(), &url)
        .with_context(|| format!("could not hash remote script {url}"))?;
    println!("{hash}");
    Ok(())
}

pub fn local(config: &SyncConfig) -> Result<()> {
    let path = config.local_script_path();
    let hash = compute_local_hash(&path)
        .with_context(|| format!("could not hash local script '{}'", path.display()))?;
    println!("{hash}");
    Ok(())
}
