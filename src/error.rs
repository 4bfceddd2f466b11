//! Error types for aicommit modules using thiserror.

use thiserror::Error;

/// Errors from an invalid or conflicting invocation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("Specify either --all or --add <FILE>...")]
    NoMode,

    #[error("--all and --add cannot be used together")]
    ConflictingModes,

    #[error("--add requires at least one file or pattern")]
    EmptyPatterns,
}

/// Errors from resolving user-supplied file patterns.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No changes to commit (working tree is clean)")]
    NoChanges,

    #[error("No changed files match: {0}")]
    NoTrackedMatch(String),

    #[error("Invalid pattern '{pattern}': {stderr}")]
    InvalidPattern { pattern: String, stderr: String },

    #[error("None of the matched files have changes to stage: {}", patterns.join(", "))]
    NothingToStage { patterns: Vec<String> },
}

/// Errors from invoking the version-control system.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("git not found. Install git and make sure it is on your PATH")]
    NotInstalled,

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git {command} exited with code {code}: {stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// Errors from the remote completion endpoint.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request to completion endpoint failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Completion endpoint responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion endpoint returned an unparseable response: {0}")]
    InvalidResponse(String),

    #[error("Completion endpoint returned no choices")]
    NoChoices,

    #[error("Language model returned an empty commit message")]
    EmptyMessage,

    #[error("Completion request timed out after {0} seconds")]
    Timeout(u64),
}

/// Any failure the commit pipeline can surface.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AppError {
    /// Process exit status for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Usage(_) => 2,
            AppError::Selection(_) => 3,
            AppError::Vcs(_) => 4,
            AppError::Api(_) => 5,
        }
    }

    /// Whether the failure stems from what the user asked for rather than
    /// from git or the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Usage(_) | AppError::Selection(_))
    }

    /// Short label printed in front of the diagnostic.
    pub fn label(&self) -> &'static str {
        if self.is_validation() {
            return "Validation error";
        }
        match self {
            AppError::Vcs(_) => "Git error",
            _ => "API error",
        }
    }

    /// One-line message printed when a run fails.
    ///
    /// API failures happen after staging, so they note that the index was
    /// left as is.
    pub fn diagnostic(&self) -> String {
        match self {
            AppError::Api(_) => format!(
                "{}: {} (staged changes were left in place)",
                self.label(),
                self
            ),
            _ => format!("{}: {}", self.label(), self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_and_non_zero() {
        let errors = [
            AppError::from(UsageError::NoMode),
            AppError::from(SelectionError::NoTrackedMatch("x".into())),
            AppError::from(VcsError::NotInstalled),
            AppError::from(ApiError::NoChoices),
        ];
        let mut codes: Vec<u8> = errors.iter().map(AppError::exit_code).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 4);
    }

    #[test]
    fn test_validation_classification() {
        assert!(AppError::from(UsageError::ConflictingModes).is_validation());
        assert!(AppError::from(SelectionError::NoTrackedMatch("a".into())).is_validation());
        assert!(!AppError::from(VcsError::NotInstalled).is_validation());
        assert!(!AppError::from(ApiError::EmptyMessage).is_validation());
    }

    #[test]
    fn test_selection_error_messages() {
        let err = SelectionError::NoTrackedMatch("src/*.rs".into());
        assert_eq!(err.to_string(), "No changed files match: src/*.rs");

        let err = SelectionError::NothingToStage {
            patterns: vec!["a.txt".into(), "docs/".into()],
        };
        assert!(err.to_string().contains("a.txt, docs/"));
    }

    #[test]
    fn test_labels_follow_validation_classification() {
        let invalid = AppError::from(SelectionError::InvalidPattern {
            pattern: "../x".into(),
            stderr: "outside repository".into(),
        });
        assert_eq!(invalid.label(), "Validation error");
        assert_eq!(invalid.exit_code(), 3);
        assert_eq!(AppError::from(UsageError::NoMode).label(), "Validation error");
        assert_eq!(AppError::from(VcsError::NotInstalled).label(), "Git error");
        assert_eq!(AppError::from(ApiError::NoChoices).label(), "API error");
    }

    #[test]
    fn test_diagnostic_is_a_single_line() {
        let api = AppError::from(ApiError::Status {
            status: 502,
            body: "bad gateway".into(),
        });
        assert_eq!(
            api.diagnostic(),
            "API error: Completion endpoint responded with 502: bad gateway \
(staged changes were left in place)"
        );

        let selection = AppError::from(SelectionError::NoTrackedMatch("docs/*".into()));
        assert_eq!(
            selection.diagnostic(),
            "Validation error: No changed files match: docs/*"
        );
        assert!(!api.diagnostic().contains('\n'));
    }

    #[test]
    fn test_vcs_error_includes_stderr() {
        let err = VcsError::NonZeroExit {
            command: "commit".into(),
            code: 1,
            stderr: "nothing to commit".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("git commit"));
        assert!(msg.contains("nothing to commit"));
    }
}
