//! AI-generated commits: the pipeline from changed files to a new commit.
//!
//! Stages run strictly in sequence: stage, collect diffs, budget, build the
//! prompt, generate the message, commit. Staging is not rolled back when a
//! later stage fails.

pub mod budget;
pub mod filter;
pub mod message;
pub mod prompt;

pub use budget::{
    CharRatioEstimator, Cl100kEstimator, DETAIL_TOKEN_BUDGET, MAX_TOKENS, PartitionResult,
    TokenEstimator, partition,
};
pub use filter::is_probably_binary;
pub use message::{extract_commit_message, generate_commit_message};
pub use prompt::{COMMIT_MARKER, build_prompt};

use tracing::{debug, info};

use crate::error::{AppError, SelectionError};
use crate::git::{ChangeRecord, CommitResult, StageMode, VersionControl, collect_diffs, stage_changes};
use crate::llm::CompletionClient;

/// What to stage and whether to actually commit.
#[derive(Debug, Clone)]
pub struct CommitOptions {
    pub mode: StageMode,
    /// Stop after generating the message. Staging still happens.
    pub dry_run: bool,
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub staged: Vec<ChangeRecord>,
    pub message: String,
    /// Files whose full diff went into the prompt.
    pub detailed_count: usize,
    /// Files listed by name only.
    pub summarized_count: usize,
    /// `None` for dry runs.
    pub commit: Option<CommitResult>,
}

/// Run the whole pipeline against the given collaborators.
pub async fn run_commit<V, C, E>(
    vcs: &V,
    client: &C,
    estimator: &E,
    options: &CommitOptions,
) -> Result<CommitOutcome, AppError>
where
    V: VersionControl + ?Sized,
    C: CompletionClient + ?Sized,
    E: TokenEstimator + ?Sized,
{
    let staged = stage_changes(vcs, &options.mode).await?;
    if staged.is_empty() {
        return Err(SelectionError::NoChanges.into());
    }
    info!("Staged {} file(s)", staged.len());

    let diffs = collect_diffs(vcs, &staged).await;
    let PartitionResult { detailed, summary } = partition(diffs, estimator);
    debug!(
        "{} detailed, {} summarized",
        detailed.len(),
        summary.len()
    );

    let prompt = build_prompt(&detailed, &summary);
    debug!("Commit prompt length: {} chars", prompt.chars().count());

    let message = generate_commit_message(client, &prompt).await?;

    let commit = if options.dry_run {
        info!("Dry run, skipping commit");
        None
    } else {
        Some(vcs.commit(&message).await?)
    };

    Ok(CommitOutcome {
        staged,
        message,
        detailed_count: detailed.len(),
        summarized_count: summary.len(),
        commit,
    })
}
