//! Staged diff collection, one file at a time.

use tracing::{debug, warn};

use crate::error::VcsError;
use crate::git::status::ChangeRecord;
use crate::git::vcs::VersionControl;

/// A staged change together with its diff text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRecord {
    pub status: String,
    pub path: String,
    /// Empty when the file has no staged diff or the diff could not be read.
    pub diff_text: String,
}

impl DiffRecord {
    pub fn new(
        status: impl Into<String>,
        path: impl Into<String>,
        diff_text: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            path: path.into(),
            diff_text: diff_text.into(),
        }
    }

    /// `path (status)`, the form used when a diff is listed by name only.
    pub fn label(&self) -> String {
        format!("{} ({})", self.path, self.status)
    }
}

/// Retrieve the staged diff for each record, preserving input order.
///
/// A failure for one file does not abort the collection: that file gets an
/// empty diff and a warning is logged.
pub async fn collect_diffs<V: VersionControl + ?Sized>(
    vcs: &V,
    records: &[ChangeRecord],
) -> Vec<DiffRecord> {
    let mut diffs = Vec::with_capacity(records.len());
    for record in records {
        let result = vcs.staged_diff(&record.path).await;
        let diff_text = diff_text_or_empty(&record.path, result);
        debug!("{}: {} byte diff", record.path, diff_text.len());
        diffs.push(DiffRecord::new(&record.status, &record.path, diff_text));
    }
    diffs
}

fn diff_text_or_empty(path: &str, result: Result<String, VcsError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not read staged diff for {}: {}", path, e);
            String::new()
        }
    }
}
