//! brewsync core library — configuration, domain newtypes, errors.
//!
//! - [`config`] — [`SyncConfig`] loading and overrides
//! - [`types`] — [`ToolUrl`] and [`Sha256Hex`]
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigOverrides, SyncConfig, CONFIG_FILE_NAME};
pub use error::ConfigError;
pub use types::{Sha256Hex, ToolUrl};
