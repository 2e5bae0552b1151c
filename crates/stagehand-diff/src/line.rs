//! Line classification and hunk flattening.

use serde::Serialize;
use stagehand_types::DiffHunk;

/// A single classified diff line.
///
/// `\` lines ("No newline at end of file") count as removals: they annotate
/// the removed side and are never content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub old_line_number: Option<u32>,
    pub new_line_number: Option<u32>,
    pub added: bool,
    pub removed: bool,
    pub text: String,
}

/// Classify a raw line by its leading marker: `(added, removed)`.
pub fn classify(text: &str) -> (bool, bool) {
    match text.chars().next() {
        Some('+') => (true, false),
        Some('-') | Some('\\') => (false, true),
        _ => (false, false),
    }
}

/// Flatten hunks into one ordered line sequence, dropping hunk boundaries.
pub fn flatten_hunks(hunks: &[DiffHunk]) -> Vec<DiffLine> {
    hunks
        .iter()
        .flat_map(|h| &h.lines)
        .map(|raw| {
            let (added, removed) = classify(raw.text());
            DiffLine {
                old_line_number: raw.old_line_number(),
                new_line_number: raw.new_line_number(),
                added,
                removed,
                text: raw.text().to_string(),
            }
        })
        .collect()
}
