//! Core error types.

use thiserror::Error;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An external command failed or could not be started.
    #[error("git error: {0}")]
    Git(#[from] liftoff_git::GitError),

    /// The service answered with a non-success status code.
    #[error("******** Upload Failed: {message} ********")]
    UploadRejected {
        /// Status code reported by the service.
        status: u16,
        /// Error text the service put before the status marker.
        message: String,
    },

    /// The response body carried no status marker.
    #[error("malformed upload response: {0:?}")]
    MalformedResponse(String),

    /// The upload request could not be sent.
    #[error("upload transport error: {0}")]
    Transport(String),

    /// Interactive input failed.
    #[error("prompt error: {0}")]
    Prompt(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Returns whether the service itself rejected the upload, as opposed to
    /// a local or transport failure.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::UploadRejected { .. })
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
