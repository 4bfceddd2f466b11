//! Token budgeting: deciding which diffs go into the prompt in full.

use tiktoken_rs::CoreBPE;
use tracing::debug;

use crate::commit::filter::is_probably_binary;
use crate::git::DiffRecord;

/// Context window of the target model, in tokens.
pub const MAX_TOKENS: usize = 128_000;

/// Tokens available to full diffs: 80% of [`MAX_TOKENS`].
pub const DETAIL_TOKEN_BUDGET: usize = MAX_TOKENS * 4 / 5;

/// Estimates how many model tokens a piece of text costs.
///
/// Implementations must be deterministic and non-decreasing in text length.
pub trait TokenEstimator: Send + Sync {
    fn estimate_tokens(&self, text: &str) -> usize;
}

impl<F> TokenEstimator for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn estimate_tokens(&self, text: &str) -> usize {
        self(text)
    }
}

/// Approximates tokens as a fixed fraction of the character count, rounded up.
#[derive(Debug, Clone, Copy)]
pub struct CharRatioEstimator {
    tokens_per_char: f64,
}

impl CharRatioEstimator {
    pub const DEFAULT_TOKENS_PER_CHAR: f64 = 0.25;

    pub fn new(tokens_per_char: f64) -> Self {
        Self { tokens_per_char }
    }
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOKENS_PER_CHAR)
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate_tokens(&self, text: &str) -> usize {
        (text.chars().count() as f64 * self.tokens_per_char).ceil() as usize
    }
}

/// Counts tokens with the `cl100k_base` BPE vocabulary.
pub struct Cl100kEstimator {
    bpe: CoreBPE,
}

impl Cl100kEstimator {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            bpe: tiktoken_rs::cl100k_base()?,
        })
    }
}

impl TokenEstimator for Cl100kEstimator {
    fn estimate_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Diffs split into those sent in full and those listed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionResult {
    pub detailed: Vec<DiffRecord>,
    /// `path (status)` entries for diffs that did not fit the budget.
    pub summary: Vec<String>,
}

impl PartitionResult {
    pub fn is_empty(&self) -> bool {
        self.detailed.is_empty() && self.summary.is_empty()
    }
}

/// Partition diffs against [`DETAIL_TOKEN_BUDGET`].
///
/// Binary files are dropped. Remaining diffs are taken first-fit in input
/// order: a diff is detailed if the running total plus its estimate stays
/// strictly below the budget, otherwise it is summarized and costs nothing.
/// Earlier decisions are never revisited.
pub fn partition<E: TokenEstimator + ?Sized>(
    diffs: Vec<DiffRecord>,
    estimator: &E,
) -> PartitionResult {
    let mut result = PartitionResult::default();
    let mut used = 0usize;

    for diff in diffs {
        if is_probably_binary(&diff.path) {
            debug!("Skipping binary file {}", diff.path);
            continue;
        }

        let tokens = estimator.estimate_tokens(&diff.diff_text);
        if used.saturating_add(tokens) < DETAIL_TOKEN_BUDGET {
            used += tokens;
            debug!("Detailed: {} ({} tokens, {} used)", diff.path, tokens, used);
            result.detailed.push(diff);
        } else {
            debug!("Summarized: {} ({} tokens over budget)", diff.path, tokens);
            result.summary.push(diff.label());
        }
    }

    result
}
