//! Commit workflow for stagehand.
//!
//! The [`CommitWorkflowController`] is the entry point for a presentation
//! layer: it polls the backend, reconciles the [`StagingArea`], fetches
//! visible diffs, tracks the commit mode and draft message, validates
//! commits, and issues commit, continue, abort, stash and discard commands.
//!
//! [`StagingArea`]: stagehand_staging::StagingArea

pub mod config;
pub mod controller;
pub mod draft;
pub mod error;
pub mod validation;

pub use config::StagingConfig;
pub use controller::{CommitWorkflowController, DiffFetchSummary, IgnoreOutcome, RefreshReport};
pub use draft::DraftMessage;
pub use error::{WorkflowError, WorkflowResult};
pub use validation::{validate_commit, CommitMode, CommitValidationError};
