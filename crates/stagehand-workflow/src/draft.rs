//! The commit message being drafted.

use stagehand_types::{compose_message, HeadCommit};

/// Local title and body; never seen by the backend until a commit, merge
/// continuation or stash is issued.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftMessage {
    pub title: String,
    pub body: String,
}

impl DraftMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn from_head(head: &HeadCommit) -> Self {
        Self::new(head.title.clone(), head.body.clone())
    }

    /// The full message: `title`, or `title\n\nbody` when a body exists.
    pub fn compose(&self) -> String {
        compose_message(&self.title, &self.body)
    }

    /// `true` while the draft is exactly HEAD's message.
    pub fn matches(&self, head: &HeadCommit) -> bool {
        self.title == head.title && self.body == head.body
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.body.clear();
    }
}
