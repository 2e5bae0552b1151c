//! Error types for backend calls.

use thiserror::Error;

/// Wire code: the status query ran outside a working tree.
pub const CODE_MUST_BE_IN_WORKING_TREE: &str = "must-be-in-working-tree";
/// Wire code: a diff was requested for a path that no longer exists.
pub const CODE_NO_SUCH_FILE: &str = "no-such-file";
/// Wire code: committing failed because no author identity is configured.
pub const CODE_NO_IDENTITY: &str = "no-git-name-email-configured";
/// Wire code: the path is already covered by an ignore rule.
pub const CODE_ALREADY_IGNORED: &str = "file-already-git-ignored";

/// Errors reported by a [`Backend`](crate::Backend).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The repository path is not inside a working tree.
    #[error("not inside a working tree: {0}")]
    MustBeInWorkingTree(String),

    /// The file disappeared between the status poll and the diff fetch.
    #[error("no such file: {0}")]
    NoSuchFile(String),

    /// Committing requires `user.name` and `user.email`.
    #[error("git user name and/or email not configured")]
    NoIdentityConfigured,

    /// The file is already ignored.
    #[error("file already ignored: {0}")]
    AlreadyIgnored(String),

    /// Any other failure reported by the backend.
    #[error("backend error ({code}): {message}")]
    Remote { code: String, message: String },

    /// The request never reached the backend.
    #[error("transport error: {0}")]
    Transport(String),
}

impl BackendError {
    /// Map a wire error code to its typed variant.
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            CODE_MUST_BE_IN_WORKING_TREE => Self::MustBeInWorkingTree(message),
            CODE_NO_SUCH_FILE => Self::NoSuchFile(message),
            CODE_NO_IDENTITY => Self::NoIdentityConfigured,
            CODE_ALREADY_IGNORED => Self::AlreadyIgnored(message),
            _ => Self::Remote {
                code: code.to_string(),
                message,
            },
        }
    }

    /// The wire code this error corresponds to, if it came from the backend.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::MustBeInWorkingTree(_) => Some(CODE_MUST_BE_IN_WORKING_TREE),
            Self::NoSuchFile(_) => Some(CODE_NO_SUCH_FILE),
            Self::NoIdentityConfigured => Some(CODE_NO_IDENTITY),
            Self::AlreadyIgnored(_) => Some(CODE_ALREADY_IGNORED),
            Self::Remote { code, .. } => Some(code),
            Self::Transport(_) => None,
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::Remote {
            code: "unknown".to_string(),
            message: message.into(),
        }
    }
}

/// Convenience alias for backend results.
pub type BackendResult<T> = Result<T, BackendError>;
