//! Error types for the diff crate.

use stagehand_backend::BackendError;

/// Errors that can occur while filling a diff cache.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The backend failed to produce a diff. Cached content is unchanged.
    #[error("diff fetch failed for {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: BackendError,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
