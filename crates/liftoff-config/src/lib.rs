//! Configuration management for Liftoff.
//!
//! This crate handles loading the `liftoff.toml` configuration file and
//! resolving per-invocation settings from explicit arguments, environment
//! variable overrides and defaults.

mod error;
mod loader;
mod overrides;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, find_and_load_config, find_and_load_config_from, load_config};
pub use overrides::{
    API_TOKEN_VAR, Credentials, EnvOverrides, IGNORE_GIT_VAR, NOTIFY_VAR, TEAM_TOKEN_VAR,
    UploadSettings,
};
pub use schema::{Config, EnvironmentConfig, GitConfig, TestflightConfig};
