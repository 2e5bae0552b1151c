//! Error types for the workflow crate.

use stagehand_backend::BackendError;
use stagehand_staging::StagingError;
use thiserror::Error;

use crate::validation::CommitValidationError;

const IDENTITY_TITLE: &str = "Git email and/or name not configured";
const IDENTITY_DETAILS: &str = "You need to configure your git email and username to commit files.\n\
Run `git config --global user.name \"your name\"` and `git config --global user.email \"your@email.com\"`";

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Committing needs an author identity the user has to configure.
    #[error("Git email and/or name not configured")]
    IdentityNotConfigured,

    /// The repository path is not inside a working tree.
    #[error("not inside a working tree: {0}")]
    NotInWorkingTree(String),

    #[error("cannot commit: {0}")]
    Validation(CommitValidationError),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl WorkflowError {
    /// Title and explanation for errors the user can fix themselves.
    pub fn user_message(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::IdentityNotConfigured => Some((IDENTITY_TITLE, IDENTITY_DETAILS)),
            _ => None,
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_error_explains_fix() {
        let err = WorkflowError::IdentityNotConfigured;
        let (title, details) = err.user_message().unwrap();
        assert_eq!(title, err.to_string());
        assert!(details.contains("git config --global user.name"));
        assert!(details.contains("git config --global user.email"));
    }

    #[test]
    fn generic_errors_have_no_user_message() {
        let err = WorkflowError::from(BackendError::generic("boom"));
        assert!(err.user_message().is_none());
    }
}
