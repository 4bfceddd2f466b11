//! Extension-based detection of files whose diffs are not worth sending.

use std::path::Path;

/// Lowercase extensions treated as binary. Matching files are dropped from
/// the prompt entirely.
pub const BINARY_EXTENSIONS: &[&str] = &["png", "jpg", "pdf", "zip", "docx", "xlsx"];

/// Whether the path's extension marks it as a non-text file.
///
/// Only the name is inspected, never the content.
pub fn is_probably_binary(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
