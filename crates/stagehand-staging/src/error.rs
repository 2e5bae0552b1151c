//! Error types for the staging crate.

/// Errors that can occur during staging-area operations.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    /// The path is not part of the current file set.
    #[error("path not in staging area: {0}")]
    PathNotFound(String),

    /// A diff fetch completed with a failure.
    #[error(transparent)]
    Diff(#[from] stagehand_diff::DiffError),
}

/// Convenience alias for staging results.
pub type StagingResult<T> = Result<T, StagingError>;
