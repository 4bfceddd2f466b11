//! The version-control collaborator the commit pipeline talks to.

use async_trait::async_trait;

use crate::error::VcsError;
use crate::git::status::ChangeRecord;

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    /// Abbreviated id of the new commit.
    pub oid: String,
    /// First line git printed for the commit, e.g. `[main 1a2b3c4] Fix login`.
    pub summary: String,
}

/// Operations the pipeline needs from a version-control system.
///
/// Paths passed in and returned are relative to the repository root.
/// This abstraction allows mocking git in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Working-tree status, one record per pending change.
    async fn status(&self) -> Result<Vec<ChangeRecord>, VcsError>;

    /// Tracked files matching a user-supplied pattern.
    async fn ls_files(&self, pattern: &str) -> Result<Vec<String>, VcsError>;

    /// Stage every change in the working tree, including deletions and
    /// untracked files.
    async fn stage_all(&self) -> Result<(), VcsError>;

    /// Stage exactly the given paths.
    async fn stage(&self, paths: &[String]) -> Result<(), VcsError>;

    /// Staged diff of a single path against the last commit.
    async fn staged_diff(&self, path: &str) -> Result<String, VcsError>;

    /// Commit the staged changes with the given message.
    async fn commit(&self, message: &str) -> Result<CommitResult, VcsError>;
}
