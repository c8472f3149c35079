//! Formula checksum substitution.
//!
//! ## `update_formula` protocol
//!
//! 1. Resolve symlinks and read the formula bytes (`NotFound` if absent).
//! 2. Rewrite the first line matching `^  sha256 ".*"$` in memory.
//! 3. No match → `MissingHashLine`, nothing written.
//! 4. Same bytes as on disk → `Unchanged`, nothing written.
//! 5. Write to `<target>.brewsync.tmp` with the formula's permissions, rename
//!    over the resolved target (atomic on POSIX).
//!
//! Patching works on raw bytes. Every other byte of the file, line endings and
//! non-UTF-8 sequences included, passes through as-is.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use brewsync_core::Sha256Hex;

use crate::error::{io_err, read_err, SyncError};

/// Two-space indented checksum stanza of a Homebrew formula, up to the opening quote.
const HASH_LINE_PREFIX: &[u8] = b"  sha256 \"";

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of [`update_formula`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The `sha256` line was rewritten; `previous` is the old quoted value.
    Updated { previous: String },
    /// The formula already carries this hash; the file was not touched.
    Unchanged,
    /// Dry-run: the line would change. `diff` is a unified diff of the file.
    WouldUpdate { previous: String, diff: String },
}

// ---------------------------------------------------------------------------
// Pure patching
// ---------------------------------------------------------------------------

/// In-memory rewrite of a formula's checksum line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashLinePatch {
    pub content: Vec<u8>,
    /// Old quoted value, lossily decoded for display.
    pub previous: String,
    /// Number of matching lines; only the first is rewritten.
    pub matches: usize,
}

/// Quoted value of `line` if it is a checksum line (terminator already stripped).
fn hash_line_value(line: &[u8]) -> Option<&[u8]> {
    line.strip_prefix(HASH_LINE_PREFIX)?.strip_suffix(b"\"")
}

fn split_terminator(piece: &[u8]) -> (&[u8], &[u8]) {
    if let Some(body) = piece.strip_suffix(b"\r\n") {
        (body, &b"\r\n"[..])
    } else if let Some(body) = piece.strip_suffix(b"\n") {
        (body, &b"\n"[..])
    } else {
        (piece, &[][..])
    }
}

/// Replace the first `  sha256 "..."` line of `content` with `hash`.
///
/// Returns `None` when no line matches.
pub fn patch_hash_line(content: &[u8], hash: &Sha256Hex) -> Option<HashLinePatch> {
    let mut out = Vec::with_capacity(content.len() + Sha256Hex::LEN);
    let mut previous = None;
    let mut matches = 0;

    for piece in content.split_inclusive(|&b| b == b'\n') {
        let (body, terminator) = split_terminator(piece);
        match hash_line_value(body) {
            Some(value) => {
                matches += 1;
                if previous.is_none() {
                    previous = Some(String::from_utf8_lossy(value).into_owned());
                    out.extend_from_slice(HASH_LINE_PREFIX);
                    out.extend_from_slice(hash.as_str().as_bytes());
                    out.push(b'"');
                    out.extend_from_slice(terminator);
                } else {
                    out.extend_from_slice(piece);
                }
            }
            None => out.extend_from_slice(piece),
        }
    }

    previous.map(|previous| HashLinePatch {
        content: out,
        previous,
        matches,
    })
}

/// The first checksum line of `content`, without its terminator.
pub fn find_hash_line(content: &[u8]) -> Option<&[u8]> {
    content
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .find(|line| hash_line_value(line).is_some())
}

// ---------------------------------------------------------------------------
// File operations
// ---------------------------------------------------------------------------

/// Patch the formula at `path` in place with `hash`.
///
/// A symlinked formula stays a symlink: the link target is rewritten.
pub fn update_formula(
    path: &Path,
    hash: &Sha256Hex,
    dry_run: bool,
) -> Result<PatchOutcome, SyncError> {
    let target = std::fs::canonicalize(path).map_err(|e| read_err(path, e))?;
    let current = std::fs::read(&target).map_err(|e| read_err(path, e))?;

    let Some(patch) = patch_hash_line(&current, hash) else {
        return Err(SyncError::MissingHashLine {
            path: path.to_path_buf(),
        });
    };
    if patch.matches > 1 {
        tracing::warn!(
            "{} has {} sha256 lines; only the first was updated",
            path.display(),
            patch.matches
        );
    }

    if patch.content == current {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(PatchOutcome::Unchanged);
    }

    if dry_run {
        let header = path.display().to_string();
        let old = String::from_utf8_lossy(&current);
        let new = String::from_utf8_lossy(&patch.content);
        let diff = TextDiff::from_lines(old.as_ref(), new.as_ref())
            .unified_diff()
            .header(&format!("a/{header}"), &format!("b/{header}"))
            .context_radius(3)
            .to_string();
        tracing::info!("[dry-run] would update: {}", path.display());
        return Ok(PatchOutcome::WouldUpdate {
            previous: patch.previous,
            diff,
        });
    }

    replace_atomically(&target, &patch.content, &tmp_path_for(&target))?;

    tracing::info!(
        "updated {}: {} -> {}",
        path.display(),
        patch.previous,
        hash
    );
    Ok(PatchOutcome::Updated {
        previous: patch.previous,
    })
}

/// `<target>.brewsync.tmp`, in the same directory so the rename stays on one filesystem.
fn tmp_path_for(target: &Path) -> PathBuf {
    let mut tmp = target.as_os_str().to_owned();
    tmp.push(".brewsync.tmp");
    PathBuf::from(tmp)
}

/// Write `content` to `tmp`, give it `target`'s permissions, rename it over `target`.
fn replace_atomically(target: &Path, content: &[u8], tmp: &Path) -> Result<(), SyncError> {
    let permissions = std::fs::metadata(target)
        .map_err(|e| io_err(target, e))?
        .permissions();
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    if let Err(e) = std::fs::set_permissions(tmp, permissions) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(tmp, e));
    }
    if let Err(e) = std::fs::rename(tmp, target) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(target, e));
    }
    Ok(())
}

/// Re-read the formula and return its checksum line, if any.
pub fn verify_formula(path: &Path) -> Result<Option<String>, SyncError> {
    let content = std::fs::read(path).map_err(|e| read_err(path, e))?;
    Ok(find_hash_line(&content).map(|line| String::from_utf8_lossy(line).into_owned()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
