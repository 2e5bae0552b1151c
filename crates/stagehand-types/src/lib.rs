//! Foundation types for stagehand.
//!
//! These are the values exchanged with the version-control backend. Every
//! other stagehand crate depends on `stagehand-types`.
//!
//! # Key Types
//!
//! - [`StatusSnapshot`] -- One poll's worth of authoritative file status
//! - [`FileStatus`] / [`FileType`] -- Per-path status as reported by the backend
//! - [`DiffHunk`] / [`RawDiffLine`] -- Line-level diff content for one file
//! - [`CommitRequest`] / [`DiscardTarget`] -- Command payloads
//! - [`HeadCommit`] -- Title and body of the current HEAD commit

pub mod commit;
pub mod diff;
pub mod error;
pub mod status;

pub use commit::{compose_message, CommitRequest, DiscardTarget, HeadCommit};
pub use diff::{DiffHunk, RawDiffLine};
pub use error::TypeError;
pub use status::{FileStatus, FileType, SnapshotFile, StatusSnapshot};
