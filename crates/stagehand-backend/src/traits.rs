//! The collaborator traits the staging engine talks to.

use async_trait::async_trait;
use stagehand_types::{CommitRequest, DiffHunk, DiscardTarget, HeadCommit, StatusSnapshot};

use crate::error::BackendResult;

/// Version-control backend for one repository.
///
/// Every call is a non-blocking request; the engine never assumes ordering
/// between outstanding calls.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn status(&self) -> BackendResult<StatusSnapshot>;
    async fn diff(&self, path: &str) -> BackendResult<Vec<DiffHunk>>;
    async fn commit(&self, request: &CommitRequest) -> BackendResult<()>;
    async fn rebase_continue(&self) -> BackendResult<()>;
    async fn rebase_abort(&self) -> BackendResult<()>;
    async fn merge_continue(&self, message: &str) -> BackendResult<()>;
    async fn merge_abort(&self) -> BackendResult<()>;
    async fn discard_changes(&self, target: &DiscardTarget) -> BackendResult<()>;
    /// Fails with [`BackendError::AlreadyIgnored`](crate::BackendError::AlreadyIgnored)
    /// when an ignore rule already covers the path.
    async fn ignore_file(&self, path: &str) -> BackendResult<()>;
    async fn resolve_conflicts(&self, files: &[String]) -> BackendResult<()>;
    async fn create_stash(&self, message: &str) -> BackendResult<()>;
}

/// Yes/no confirmation for destructive actions.
#[async_trait]
pub trait ConfirmDialog: Send + Sync {
    /// Returns `true` only when the user answered yes.
    async fn confirm(&self, title: &str, details: &str) -> bool;
}

/// Read access to the commit graph.
pub trait CommitGraph: Send + Sync {
    /// The commit HEAD points at, or `None` in an empty repository.
    fn head(&self) -> Option<HeadCommit>;
}
