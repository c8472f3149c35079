//! # brewsync-sync
//!
//! Formula hash synchronization.
//!
//! The pieces compose in one direction only: hash the tool script
//! ([`hash`], via a [`Fetcher`] for the remote copy), patch the formula's
//! `sha256` line ([`formula`]), then stage/commit/push through a
//! [`VersionControl`] client ([`vcs`]). [`pipeline`] wires them together for
//! the CLI tasks.

pub mod error;
pub mod fetch;
pub mod formula;
pub mod hash;
pub mod justfile;
pub mod pipeline;
pub mod vcs;

pub use error::SyncError;
pub use fetch::{Fetcher, HttpFetcher};
pub use formula::{update_formula, verify_formula, PatchOutcome};
pub use hash::{compute_local_hash, compute_remote_hash, sha256_hex};
pub use pipeline::{release, FormulaUpdate, ReleaseReport};
pub use vcs::{commit_and_push, DeployOutcome, GitCli, VersionControl};
