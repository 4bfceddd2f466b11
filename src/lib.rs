//! aicommit - stage changes and commit them with an AI-generated message.
//!
//! # Overview
//!
//! aicommit stages the requested changes, collects their staged diffs, fits
//! them into a token budget, asks a chat-completion endpoint for a commit
//! message, and commits with it.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;

// Re-export commonly used types
pub use commit::{CommitOptions, CommitOutcome, run_commit};
pub use config::Config;
pub use error::{ApiError, AppError, SelectionError, UsageError, VcsError};
pub use git::{ChangeRecord, CommitResult, DiffRecord, GitCli, StageMode, VersionControl};
pub use llm::{CompletionClient, HttpCompletionClient};
