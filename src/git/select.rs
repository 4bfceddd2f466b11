//! Resolving which changed files to stage, and staging them.
//!
//! Staging mutates the repository index. Nothing here rolls it back: if a
//! later pipeline step fails, whatever was staged stays staged.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::error::{AppError, SelectionError, UsageError, VcsError};
use crate::git::status::{ChangeRecord, list_changes};
use crate::git::vcs::VersionControl;

/// Which changes to stage before generating the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageMode {
    /// Every change in the working tree.
    All,
    /// Only changed tracked files matching these patterns.
    Patterns(Vec<String>),
}

impl StageMode {
    /// Build the mode from the two mutually exclusive CLI flags.
    pub fn from_flags(all: bool, add: Option<Vec<String>>) -> Result<Self, UsageError> {
        match (all, add) {
            (true, Some(_)) => Err(UsageError::ConflictingModes),
            (true, None) => Ok(StageMode::All),
            (false, Some(patterns)) if patterns.is_empty() => Err(UsageError::EmptyPatterns),
            (false, Some(patterns)) => Ok(StageMode::Patterns(patterns)),
            (false, None) => Err(UsageError::NoMode),
        }
    }
}

/// Stage changes according to `mode` and return the records that were staged.
///
/// In pattern mode the returned records are re-read from the status after
/// staging, restricted to the validated paths.
pub async fn stage_changes<V: VersionControl + ?Sized>(
    vcs: &V,
    mode: &StageMode,
) -> Result<Vec<ChangeRecord>, AppError> {
    match mode {
        StageMode::All => {
            vcs.stage_all().await?;
            Ok(list_changes(vcs).await?)
        }
        StageMode::Patterns(patterns) => {
            let valid = validate_patterns(vcs, patterns).await?;
            debug!("Staging {} validated file(s)", valid.len());
            vcs.stage(&valid).await?;

            let valid: HashSet<&str> = valid.iter().map(String::as_str).collect();
            Ok(list_changes(vcs)
                .await?
                .into_iter()
                .filter(|change| valid.contains(change.path.as_str()))
                .collect())
        }
    }
}

/// Resolve patterns to the set of changed, tracked files they cover.
///
/// Fails if git rejects a pattern, if any single pattern matches no tracked
/// file, or if the patterns
/// together cover no changed file. Tracked-but-unchanged matches are skipped.
/// The result is deduplicated and sorted.
pub async fn validate_patterns<V: VersionControl + ?Sized>(
    vcs: &V,
    patterns: &[String],
) -> Result<Vec<String>, AppError> {
    let changed: HashSet<String> = list_changes(vcs)
        .await?
        .into_iter()
        .map(|change| change.path)
        .collect();

    let mut valid = BTreeSet::new();
    for pattern in patterns {
        let matched = match vcs.ls_files(pattern).await {
            Ok(matched) => matched,
            Err(VcsError::NonZeroExit { stderr, .. }) => {
                return Err(SelectionError::InvalidPattern {
                    pattern: pattern.clone(),
                    stderr,
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };
        if matched.is_empty() {
            return Err(SelectionError::NoTrackedMatch(pattern.clone()).into());
        }

        let before = valid.len();
        valid.extend(matched.into_iter().filter(|path| changed.contains(path)));
        debug!(
            "Pattern '{}' selected {} changed file(s)",
            pattern,
            valid.len() - before
        );
    }

    if valid.is_empty() {
        return Err(SelectionError::NothingToStage {
            patterns: patterns.to_vec(),
        }
        .into());
    }

    Ok(valid.into_iter().collect())
}
