//! Version-control seam: stage, detect a staged diff, commit, push.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::SyncError;

/// Minimal version-control client used by `deploy` and `release`.
///
/// Paths are relative to the client's working tree.
pub trait VersionControl {
    fn stage(&self, path: &Path) -> Result<(), SyncError>;
    /// Whether the index holds changes to `path` relative to `HEAD`.
    fn has_staged_changes(&self, path: &Path) -> Result<bool, SyncError>;
    fn commit(&self, path: &Path, message: &str) -> Result<(), SyncError>;
    fn push(&self) -> Result<(), SyncError>;
}

/// Outcome of [`commit_and_push`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Nothing staged for the file; no commit, no push.
    NothingToCommit,
    /// A commit was created and pushed.
    Pushed,
}

/// Stage `path`; if it carries staged changes, commit them with `message` and push.
pub fn commit_and_push(
    vcs: &dyn VersionControl,
    path: &Path,
    message: &str,
) -> Result<DeployOutcome, SyncError> {
    vcs.stage(path)?;
    if !vcs.has_staged_changes(path)? {
        tracing::info!("no staged changes for {}; skipping commit", path.display());
        return Ok(DeployOutcome::NothingToCommit);
    }
    vcs.commit(path, message)?;
    vcs.push()?;
    tracing::info!("committed and pushed {}: {message}", path.display());
    Ok(DeployOutcome::Pushed)
}

// ---------------------------------------------------------------------------
// git CLI implementation
// ---------------------------------------------------------------------------

/// [`VersionControl`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    work_tree: PathBuf,
    remote: Option<String>,
}

impl GitCli {
    pub fn new(work_tree: impl Into<PathBuf>, remote: Option<String>) -> Self {
        Self {
            work_tree: work_tree.into(),
            remote,
        }
    }

    fn run<I, S>(&self, args: I) -> Result<(String, Output), SyncError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let command = args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!("git {command}");

        let output = Command::new("git")
            .current_dir(&self.work_tree)
            .args(&args)
            .output()
            .map_err(|e| SyncError::Git {
                command: command.clone(),
                message: e.to_string(),
            })?;
        Ok((command, output))
    }

    /// Run `git <args>` and fail unless it exits 0.
    fn run_checked<I, S>(&self, args: I) -> Result<(), SyncError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (command, output) = self.run(args)?;
        if output.status.success() {
            return Ok(());
        }
        Err(SyncError::Git {
            command,
            message: failure_message(&output),
        })
    }
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let detail = if stderr.trim().is_empty() {
        stdout.trim()
    } else {
        stderr.trim()
    };
    if detail.is_empty() {
        format!("exited with {}", output.status)
    } else {
        format!("exited with {}: {detail}", output.status)
    }
}

impl VersionControl for GitCli {
    fn stage(&self, path: &Path) -> Result<(), SyncError> {
        self.run_checked([OsStr::new("add"), OsStr::new("--"), path.as_os_str()])
    }

    fn has_staged_changes(&self, path: &Path) -> Result<bool, SyncError> {
        let (command, output) = self.run([
            OsStr::new("diff"),
            OsStr::new("--cached"),
            OsStr::new("--quiet"),
            OsStr::new("--"),
            path.as_os_str(),
        ])?;
        // `--quiet` implies `--exit-code`: 0 = clean, 1 = differences.
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(SyncError::Git {
                command,
                message: failure_message(&output),
            }),
        }
    }

    fn commit(&self, path: &Path, message: &str) -> Result<(), SyncError> {
        self.run_checked([
            OsStr::new("commit"),
            OsStr::new("-m"),
            OsStr::new(message),
            OsStr::new("--"),
            path.as_os_str(),
        ])
    }

    fn push(&self) -> Result<(), SyncError> {
        match &self.remote {
            Some(remote) => self.run_checked(["push", remote.as_str()]),
            None => self.run_checked(["push"]),
        }
    }
}
