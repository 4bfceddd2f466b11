//! [`VersionControl`] backed by the system `git` binary.
//!
//! Shelling out inherits the user's git config, hooks and credential setup,
//! so commits behave exactly as `git commit` would.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::VcsError;
use crate::git::status::{ChangeRecord, parse_porcelain};
use crate::git::vcs::{CommitResult, VersionControl};

/// Check that a `git` executable is reachable on PATH.
pub fn check_git_installed() -> Result<(), VcsError> {
    which::which("git").map(|_| ()).map_err(|_| VcsError::NotInstalled)
}

/// Git invoked as a subprocess from a fixed working directory.
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Run git with the given arguments and return its stdout.
    ///
    /// `operation` names the command in error messages so commit messages
    /// and path lists are not echoed back.
    async fn run_git(&self, args: &[&str], operation: &str) -> Result<String, VcsError> {
        debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(["-c", "core.quotepath=off"])
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(VcsError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(VcsError::NonZeroExit {
                command: operation.to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Pathspec that matches `path` literally, relative to the repository root
/// regardless of which subdirectory git runs from.
fn top_literal(path: &str) -> String {
    format!(":(top,literal){path}")
}

#[async_trait]
impl VersionControl for GitCli {
    async fn status(&self) -> Result<Vec<ChangeRecord>, VcsError> {
        let stdout = self
            .run_git(&["status", "--porcelain", "--untracked-files=all"], "status")
            .await?;
        Ok(parse_porcelain(&stdout))
    }

    async fn ls_files(&self, pattern: &str) -> Result<Vec<String>, VcsError> {
        let stdout = self
            .run_git(&["ls-files", "-z", "--full-name", "--", pattern], "ls-files")
            .await?;
        Ok(stdout
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn stage_all(&self) -> Result<(), VcsError> {
        self.run_git(&["add", "-A"], "add").await.map(|_| ())
    }

    async fn stage(&self, paths: &[String]) -> Result<(), VcsError> {
        if paths.is_empty() {
            return Ok(());
        }
        let specs: Vec<String> = paths.iter().map(|p| top_literal(p)).collect();
        let mut args = vec!["add", "-A", "--"];
        args.extend(specs.iter().map(String::as_str));
        self.run_git(&args, "add").await.map(|_| ())
    }

    async fn staged_diff(&self, path: &str) -> Result<String, VcsError> {
        let spec = top_literal(path);
        self.run_git(&["diff", "--cached", "--", &spec], "diff").await
    }

    async fn commit(&self, message: &str) -> Result<CommitResult, VcsError> {
        let stdout = self.run_git(&["commit", "-m", message], "commit").await?;
        let oid = self
            .run_git(&["rev-parse", "--short", "HEAD"], "rev-parse")
            .await?
            .trim()
            .to_string();
        let summary = stdout.lines().next().unwrap_or_default().trim().to_string();
        Ok(CommitResult { oid, summary })
    }
}
