//! Git operations: status, staging, diffs and commits.

pub mod cli;
pub mod diff;
pub mod select;
pub mod status;
pub mod vcs;

pub use cli::{GitCli, check_git_installed};
pub use diff::{DiffRecord, collect_diffs};
pub use select::{StageMode, stage_changes, validate_patterns};
pub use status::{ChangeRecord, list_changes, parse_porcelain};
pub use vcs::{CommitResult, VersionControl};
