//! Diff content as returned by the backend.

use serde::{Deserialize, Serialize};

/// One raw diff line: `(old line number, new line number, text)`.
///
/// The text keeps its leading marker (`+`, `-`, `\` or a space). Line
/// numbers are absent for lines that exist on one side only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDiffLine(pub Option<u32>, pub Option<u32>, pub String);

impl RawDiffLine {
    pub fn new(old: Option<u32>, new: Option<u32>, text: impl Into<String>) -> Self {
        Self(old, new, text.into())
    }

    pub fn old_line_number(&self) -> Option<u32> {
        self.0
    }

    pub fn new_line_number(&self) -> Option<u32> {
        self.1
    }

    pub fn text(&self) -> &str {
        &self.2
    }
}

/// A contiguous region of changes in one file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    pub lines: Vec<RawDiffLine>,
}

impl DiffHunk {
    pub fn new(lines: Vec<RawDiffLine>) -> Self {
        Self { lines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_line_is_a_json_triple() {
        let hunks: Vec<DiffHunk> = serde_json::from_str(
            r#"[{ "lines": [[1, 1, " context"], [null, 2, "+added"], [2, null, "-gone"]] }]"#,
        )
        .unwrap();
        assert_eq!(hunks.len(), 1);
        let lines = &hunks[0].lines;
        assert_eq!(lines[0], RawDiffLine::new(Some(1), Some(1), " context"));
        assert_eq!(lines[1].old_line_number(), None);
        assert_eq!(lines[1].new_line_number(), Some(2));
        assert_eq!(lines[2].text(), "-gone");
    }
}
