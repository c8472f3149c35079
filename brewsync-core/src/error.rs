//! Error types for brewsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading the config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with file path and serde_yaml line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config file did not exist at an explicitly requested path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// A value is present but unusable (empty user, malformed digest, ...).
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
