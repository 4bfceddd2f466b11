//! Working-tree status listing and `git status --porcelain` parsing.

use tracing::{debug, warn};

use crate::error::VcsError;
use crate::git::vcs::VersionControl;

/// A single pending change in the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Porcelain status code with padding removed, e.g. `M`, `A`, `D`, `??`.
    pub status: String,
    pub path: String,
}

impl ChangeRecord {
    pub fn new(status: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            path: path.into(),
        }
    }
}

/// List the pending changes in the working tree.
pub async fn list_changes<V: VersionControl + ?Sized>(
    vcs: &V,
) -> Result<Vec<ChangeRecord>, VcsError> {
    let changes = vcs.status().await?;
    debug!("{} changed file(s) in working tree", changes.len());
    Ok(changes)
}

/// Parse `git status --porcelain` (v1) output.
///
/// Each line is `XY PATH`. Trailing whitespace is trimmed; the leading
/// columns are kept because a blank `X` is meaningful. Blank output yields
/// an empty list.
pub fn parse_porcelain(output: &str) -> Vec<ChangeRecord> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = parse_status_line(line.trim_end());
            if parsed.is_none() {
                warn!("Skipping unrecognized status line: {:?}", line);
            }
            parsed
        })
        .collect()
}

fn parse_status_line(line: &str) -> Option<ChangeRecord> {
    let code = line.get(..2)?;
    let rest = line.get(3..)?.trim();
    if rest.is_empty() {
        return None;
    }

    // Renames and copies are reported as `ORIG -> PATH`.
    let path = if code.contains('R') || code.contains('C') {
        rest.rsplit_once(" -> ").map_or(rest, |(_, new)| new)
    } else {
        rest
    };

    Some(ChangeRecord::new(code.trim(), unquote(path)))
}

/// Undo the C-style quoting git applies to paths with unusual characters.
///
/// Octal escapes encode raw bytes, so the path is rebuilt as bytes and then
/// decoded as UTF-8.
fn unquote(path: &str) -> String {
    let Some(inner) = path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    else {
        return path.to_string();
    };

    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 == bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let escaped = bytes[i + 1];
        if let Some(byte) = octal_byte(&bytes[i + 1..]) {
            out.push(byte);
            i += 4;
            continue;
        }
        match escaped {
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b't' => out.push(b'\t'),
            b'n' => out.push(b'\n'),
            b'v' => out.push(0x0b),
            b'f' => out.push(0x0c),
            b'r' => out.push(b'\r'),
            b'"' | b'\\' => out.push(escaped),
            other => out.extend_from_slice(&[b'\\', other]),
        }
        i += 2;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Value of a leading three-digit octal escape such as `001` or `303`.
fn octal_byte(digits: &[u8]) -> Option<u8> {
    let digits = digits.get(..3)?;
    if !digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
        return None;
    }
    let value = digits
        .iter()
        .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
    u8::try_from(value).ok()
}
