//! Prompt construction for AI-generated commit messages.

use crate::git::DiffRecord;

/// Maximum characters of a single diff included in the prompt.
pub const MAX_DIFF_CHARS: usize = 5_000;

/// Appended after every diff body.
pub const TRUNCATION_MARKER: &str = "...";

/// Literal the model is asked to put in front of the commit message.
pub const COMMIT_MARKER: &str = "Comments of commit:";

/// System instruction sent with every request.
pub const SYSTEM_PROMPT: &str = "You are a senior DevOps software engineer, now you are working on \
submitting a git commit with AI generated comments.";

const DETAILED_HEADER: &str = "\nDetailed changes:";
const SUMMARY_HEADER: &str = "\nOther changed files (diff omitted):";

/// Build the user prompt from the partitioned changes.
///
/// Each detailed diff is cut to [`MAX_DIFF_CHARS`] characters regardless of
/// its token estimate. With nothing to show, the prompt is only the
/// instruction block.
pub fn build_prompt(detailed: &[DiffRecord], summary: &[String]) -> String {
    let mut sections = Vec::new();

    if !detailed.is_empty() {
        sections.push(DETAILED_HEADER.to_string());
        for diff in detailed {
            sections.push(format!(
                "\nFile: {} ({})\nDiff:\n{}{}",
                diff.path,
                diff.status,
                truncate_chars(&diff.diff_text, MAX_DIFF_CHARS),
                TRUNCATION_MARKER
            ));
        }
    }

    if !summary.is_empty() {
        sections.push(SUMMARY_HEADER.to_string());
        sections.push(summary.join("\n"));
    }

    sections.push(instruction());
    sections.join("\n")
}

fn instruction() -> String {
    format!(
        "Above text is the changes of a git commit, please write a brief and friendly Git commit \
comment according to the changes.\n\
The comment will be used as the commit message.\n\
The final output must be in ENGLISH and the summarized text MUST start with \"{COMMIT_MARKER}\". \
Please DO NOT GIVE optimization suggestions."
    )
}

/// First `max` characters of `text`, cut on a character boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_includes_detailed_entries() {
        let detailed = vec![
            DiffRecord::new("M", "src/auth/login.rs", "+fn login() {}\n"),
            DiffRecord::new("A", "src/auth/session.rs", "+struct Session;\n"),
        ];
        let prompt = build_prompt(&detailed, &[]);

        assert!(prompt.contains("Detailed changes:"));
        assert!(prompt.contains("File: src/auth/login.rs (M)\nDiff:\n+fn login() {}\n..."));
        assert!(prompt.contains("File: src/auth/session.rs (A)\nDiff:\n+struct Session;\n..."));
        assert!(!prompt.contains("Other changed files"));
    }

    #[test]
    fn test_build_prompt_lists_summary_entries() {
        let summary = vec!["big.sql (M)".to_string(), "vendor.js (A)".to_string()];
        let prompt = build_prompt(&[], &summary);

        assert!(prompt.contains("Other changed files (diff omitted):\nbig.sql (M)\nvendor.js (A)"));
        assert!(!prompt.contains("Detailed changes:"));
    }

    #[test]
    fn test_detailed_section_precedes_summary() {
        let detailed = vec![DiffRecord::new("M", "a.rs", "+a")];
        let summary = vec!["b.rs (M)".to_string()];
        let prompt = build_prompt(&detailed, &summary);

        let detailed_at = prompt.find("Detailed changes:").unwrap();
        let summary_at = prompt.find("Other changed files").unwrap();
        let instruction_at = prompt.find("Above text is the changes").unwrap();
        assert!(detailed_at < summary_at);
        assert!(summary_at < instruction_at);
    }

    #[test]
    fn test_long_diff_truncated_to_exact_limit() {
        let diff_text = "a".repeat(MAX_DIFF_CHARS) + &"b".repeat(1_000);
        let detailed = vec![DiffRecord::new("M", "long.rs", diff_text)];
        let prompt = build_prompt(&detailed, &[]);

        let expected = format!("Diff:\n{}{}", "a".repeat(MAX_DIFF_CHARS), TRUNCATION_MARKER);
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains("bb"));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let diff_text = "é".repeat(MAX_DIFF_CHARS + 10);
        let detailed = vec![DiffRecord::new("M", "accents.txt", diff_text)];
        let prompt = build_prompt(&detailed, &[]);

        let expected = format!("Diff:\n{}{}", "é".repeat(MAX_DIFF_CHARS), TRUNCATION_MARKER);
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"é".repeat(MAX_DIFF_CHARS + 1)));
    }

    #[test]
    fn test_empty_diff_still_listed() {
        let detailed = vec![DiffRecord::new("A", "empty.txt", "")];
        let prompt = build_prompt(&detailed, &[]);
        assert!(prompt.contains("File: empty.txt (A)\nDiff:\n..."));
    }

    #[test]
    fn test_degenerate_prompt_is_instruction_only() {
        let prompt = build_prompt(&[], &[]);
        assert!(!prompt.is_empty());
        assert_eq!(prompt, instruction());
        assert!(prompt.contains("\"Comments of commit:\""));
        assert!(prompt.contains("DO NOT GIVE optimization suggestions"));
        assert!(prompt.contains("ENGLISH"));
    }

    #[test]
    fn test_truncate_chars_short_text_unchanged() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
