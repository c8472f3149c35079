pub mod config;
pub mod deploy;
pub mod lint;
pub mod sha;
pub mod update;
