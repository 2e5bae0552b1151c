//! Commit-related payloads.

use serde::{Deserialize, Serialize};

/// Title and body of the commit HEAD points at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadCommit {
    pub title: String,
    pub body: String,
}

impl HeadCommit {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A request to record the given files as a new (or amended) commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    pub files: Vec<String>,
    pub message: String,
    pub amend: bool,
}

/// What a discard-changes command applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscardTarget {
    File(String),
    All,
}

/// Join a title and body the way commit messages are written: the body,
/// when present, follows a blank line.
pub fn compose_message(title: &str, body: &str) -> String {
    if body.is_empty() {
        title.to_string()
    } else {
        format!("{title}\n\n{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_with_body() {
        assert_eq!(compose_message("Fix bug", "Details here"), "Fix bug\n\nDetails here");
    }

    #[test]
    fn compose_without_body() {
        assert_eq!(compose_message("Fix bug", ""), "Fix bug");
    }

    #[test]
    fn discard_target_serde() {
        let json = serde_json::to_string(&DiscardTarget::File("a.txt".into())).unwrap();
        assert_eq!(json, r#"{"file":"a.txt"}"#);
        let all: DiscardTarget = serde_json::from_str(r#""all""#).unwrap();
        assert_eq!(all, DiscardTarget::All);
    }
}
