//! Justfile recipe indentation lint.
//!
//! `just` recipe bodies must be indented with tabs; a line indented with
//! spaces silently becomes a syntax error. Blank and comment lines are exempt.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{io_err, SyncError};

/// A space-indented line (1-based `line`, content without terminator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentViolation {
    pub line: usize,
    pub content: String,
}

fn is_exempt(line: &str) -> bool {
    let stripped = line.trim_start();
    stripped.is_empty() || stripped.starts_with('#')
}

/// Space-indented lines of `content`.
pub fn find_violations(content: &str) -> Vec<IndentViolation> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !is_exempt(line) && line.starts_with(' '))
        .map(|(idx, line)| IndentViolation {
            line: idx + 1,
            content: line.to_string(),
        })
        .collect()
}

/// Replace all leading spaces of each offending line with a single tab.
///
/// Returns `None` when nothing needs fixing.
pub fn fix_indentation(content: &str) -> Option<String> {
    let mut changed = false;
    let mut out = String::with_capacity(content.len());
    for piece in content.split_inclusive('\n') {
        if !is_exempt(piece) && piece.starts_with(' ') {
            out.push('\t');
            out.push_str(piece.trim_start_matches(' '));
            changed = true;
        } else {
            out.push_str(piece);
        }
    }
    changed.then_some(out)
}

fn read_optional(path: &Path) -> Result<Option<String>, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_err(path, e)),
    }
}

/// Lint the justfile at `path`. A missing file has no violations.
pub fn check_justfile(path: &Path) -> Result<Vec<IndentViolation>, SyncError> {
    Ok(read_optional(path)?
        .map(|content| find_violations(&content))
        .unwrap_or_default())
}

/// Fix the justfile at `path` in place. Returns whether it was modified.
pub fn fix_justfile(path: &Path) -> Result<bool, SyncError> {
    let Some(content) = read_optional(path)? else {
        return Ok(false);
    };
    let Some(fixed) = fix_indentation(&content) else {
        return Ok(false);
    };
    std::fs::write(path, fixed).map_err(|e| io_err(path, e))?;
    tracing::info!("fixed leading spaces in {}", path.display());
    Ok(true)
}
