//! Git error types.

use thiserror::Error;

/// Git and command-execution errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// A command ran but exited unsuccessfully.
    #[error("command `{command}` failed{}: {stderr}", exit_suffix(.status))]
    CommandFailed {
        /// The command line that was executed.
        command: String,
        /// Exit code, if the process was not killed by a signal.
        status: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// A command could not be started at all.
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        /// The command line that was attempted.
        command: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// No tag matches the requested label.
    #[error("no tags found for {0}")]
    NoTags(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[allow(clippy::ref_option)]
fn exit_suffix(status: &Option<i32>) -> String {
    status.map_or_else(String::new, |code| format!(" with exit code {code}"))
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;
