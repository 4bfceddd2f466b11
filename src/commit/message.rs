//! Commit message generation via the completion endpoint.

use tracing::debug;

use crate::commit::prompt::{COMMIT_MARKER, SYSTEM_PROMPT};
use crate::error::ApiError;
use crate::llm::CompletionClient;

/// Generate a commit message for the given prompt.
///
/// Fails with [`ApiError::EmptyMessage`] when nothing usable is left after
/// extraction, so an empty commit is never attempted.
pub async fn generate_commit_message<C: CompletionClient + ?Sized>(
    client: &C,
    prompt: &str,
) -> Result<String, ApiError> {
    let content = client.complete(SYSTEM_PROMPT, prompt).await?;
    debug!("Completion returned {} chars", content.chars().count());

    let message = extract_commit_message(&content);
    if message.is_empty() {
        return Err(ApiError::EmptyMessage);
    }
    Ok(message)
}

/// Pull the commit message out of a completion.
///
/// Returns the text after the last [`COMMIT_MARKER`], trimmed; without a
/// marker the whole content is returned trimmed.
pub fn extract_commit_message(content: &str) -> String {
    match content.rfind(COMMIT_MARKER) {
        Some(idx) => content[idx + COMMIT_MARKER.len()..].trim().to_string(),
        None => content.trim().to_string(),
    }
}
