//! Immutable sync configuration.
//!
//! # Sources, lowest precedence first
//!
//! 1. Built-in defaults ([`SyncConfig::default`])
//! 2. `brewsync.yaml` (or an explicit `--config` path)
//! 3. [`ConfigOverrides`] — CLI flags / `GITHUB_USER`, `TOOL_REPO`,
//!    `TOOL_SCRIPT`, `FORMULA_FILE` environment variables
//!
//! Once built, a `SyncConfig` is passed by reference into every operation;
//! nothing in the workspace holds configuration in global state.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::ToolUrl;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "brewsync.yaml";

pub const DEFAULT_TOOL_REPO: &str = "ollama-cli";
pub const DEFAULT_TOOL_SCRIPT: &str = "ollama-cli.py";
pub const DEFAULT_FORMULA_FILE: &str = "Formula/ollama-cli.rb";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";

/// Everything an invocation needs to know about the tool and its formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// GitHub account owning the tool repository.
    pub github_user: String,
    /// Repository holding the tool script.
    pub tool_repo: String,
    /// Script path, both inside the repository and relative to the working
    /// directory for local hashing.
    pub tool_script: String,
    /// Formula file whose `sha256` line gets rewritten.
    pub formula_file: PathBuf,
    pub branch: String,
    /// Remote passed to `git push`; `None` pushes to the upstream default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_remote: Option<String>,
    pub raw_base_url: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            github_user: String::new(),
            tool_repo: DEFAULT_TOOL_REPO.to_string(),
            tool_script: DEFAULT_TOOL_SCRIPT.to_string(),
            formula_file: PathBuf::from(DEFAULT_FORMULA_FILE),
            branch: DEFAULT_BRANCH.to_string(),
            git_remote: None,
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
        }
    }
}

/// Values that win over the config file when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub github_user: Option<String>,
    pub tool_repo: Option<String>,
    pub tool_script: Option<String>,
    pub formula_file: Option<PathBuf>,
}

impl SyncConfig {
    /// Load a config file that must exist.
    ///
    /// Returns `ConfigError::NotFound` if absent and `ConfigError::Parse`
    /// (with path + line context) if malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(path, &contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }),
            Err(e) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        // An empty file deserializes to `null`, which serde_yaml rejects for a struct.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply CLI / environment overrides on top of this config.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(user) = overrides.github_user {
            self.github_user = user;
        }
        if let Some(repo) = overrides.tool_repo {
            self.tool_repo = repo;
        }
        if let Some(script) = overrides.tool_script {
            self.tool_script = script;
        }
        if let Some(formula) = overrides.formula_file {
            self.formula_file = formula;
        }
        self
    }

    /// Raw download URL of the tool script:
    /// `{raw_base_url}/{github_user}/{tool_repo}/{branch}/{tool_script}`.
    pub fn tool_url(&self) -> Result<ToolUrl, ConfigError> {
        for (name, value) in [
            ("github_user", &self.github_user),
            ("tool_repo", &self.tool_repo),
            ("tool_script", &self.tool_script),
            ("branch", &self.branch),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{name} is empty; set it in {CONFIG_FILE_NAME} or via the environment"
                )));
            }
        }
        let base = self.raw_base_url.trim_end_matches('/');
        let script = self.tool_script.trim_start_matches('/');
        Ok(ToolUrl(format!(
            "{base}/{}/{}/{}/{script}",
            self.github_user, self.tool_repo, self.branch
        )))
    }

    /// Local path of the tool script, relative to the working directory.
    pub fn local_script_path(&self) -> PathBuf {
        PathBuf::from(&self.tool_script)
    }

    /// Default `deploy` commit message.
    pub fn deploy_message(&self) -> String {
        format!("Update {} formula", self.tool_repo)
    }

    /// Commit message used by `release`.
    pub fn release_message(&self) -> String {
        format!("Update {} sha", self.tool_repo)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
