//! Staging area for stagehand.
//!
//! The [`StagingArea`] owns one [`FileEntity`] per path reported by the most
//! recent status snapshot. Reconciling a new snapshot keeps the local-only
//! state of surviving paths (staged flag, diff visibility, cached diff),
//! creates entities for new paths and drops the rest.

pub mod area;
pub mod entity;
pub mod error;
pub mod message;

pub use area::{Reconciliation, StagingArea};
pub use entity::FileEntity;
pub use error::{StagingError, StagingResult};
pub use message::split_message;
