//! Error types for brewsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use brewsync_core::ConfigError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An expected file (tool script, formula) is absent.
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// The HTTP request for the remote script did not succeed.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// A git invocation failed to spawn or exited unsuccessfully.
    #[error("`git {command}` failed: {message}")]
    Git { command: String, message: String },

    /// The formula has no `  sha256 "..."` line to substitute.
    #[error("no `sha256 \"...\"` line found in {path}")]
    MissingHashLine { path: PathBuf },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is incomplete for the requested operation.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

/// Map a read failure to `NotFound` when the file is missing, `Io` otherwise.
pub(crate) fn read_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    let path = path.into();
    if source.kind() == std::io::ErrorKind::NotFound {
        SyncError::NotFound { path }
    } else {
        SyncError::Io { path, source }
    }
}
