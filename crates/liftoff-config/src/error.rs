//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `liftoff.toml` in the start directory or any parent.
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    /// The file is not valid TOML or does not match the schema.
    #[error("invalid TOML in {}: {source}", path.display())]
    InvalidToml {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },

    /// The environment has no `[environments.<name>]` table.
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
