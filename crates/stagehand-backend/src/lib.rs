//! Backend contracts for stagehand.
//!
//! The staging engine never touches a repository itself. Every status query,
//! diff fetch and command goes through the [`Backend`] trait; user
//! confirmation and HEAD lookups go through [`ConfirmDialog`] and
//! [`CommitGraph`].
//!
//! # Modules
//!
//! - [`error`] -- [`BackendError`] and the backend's wire error codes
//! - [`traits`] -- The [`Backend`], [`ConfirmDialog`] and [`CommitGraph`] traits
//! - [`memory`] -- In-memory scripted implementations for tests and replay

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{BackendError, BackendResult};
pub use memory::{Command, InMemoryBackend, Operation, ScriptedDialog, StaticCommitGraph};
pub use traits::{Backend, CommitGraph, ConfirmDialog};
