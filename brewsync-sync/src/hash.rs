//! SHA-256 content fingerprints for the tool script.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

use brewsync_core::{Sha256Hex, ToolUrl};

use crate::error::{read_err, SyncError};
use crate::fetch::Fetcher;

/// Hex SHA-256 of an in-memory byte slice.
pub fn sha256_hex(bytes: &[u8]) -> Sha256Hex {
    let mut h = Sha256::new();
    h.update(bytes);
    Sha256Hex::from_digest(&h.finalize().into())
}

/// Hash a local file.
///
/// Returns `SyncError::NotFound` if `path` does not exist.
pub fn compute_local_hash(path: &Path) -> Result<Sha256Hex, SyncError> {
    let file = File::open(path).map_err(|e| read_err(path, e))?;
    let mut reader = BufReader::new(file);
    let mut h = Sha256::new();
    io::copy(&mut reader, &mut h).map_err(|e| read_err(path, e))?;
    let digest = Sha256Hex::from_digest(&h.finalize().into());
    tracing::debug!("sha256 {} = {}", path.display(), digest);
    Ok(digest)
}

/// Fetch `url` and hash the response body.
///
/// Returns `SyncError::Fetch` if the request does not succeed.
pub fn compute_remote_hash(fetcher: &dyn Fetcher, url: &ToolUrl) -> Result<Sha256Hex, SyncError> {
    let body = fetcher.fetch(url)?;
    let digest = sha256_hex(&body);
    tracing::debug!("sha256 {} ({} bytes) = {}", url, body.len(), digest);
    Ok(digest)
}
