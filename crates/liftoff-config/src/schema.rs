//! Configuration schema.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// TestFlight service configuration.
    #[serde(default)]
    pub testflight: TestflightConfig,

    /// Working tree checks.
    #[serde(default)]
    pub git: GitConfig,

    /// Deployment environments, keyed by the label used for their tags.
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

impl Config {
    /// Returns the configuration for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEnvironment`] if it is not configured.
    pub fn environment(&self, name: &str) -> ConfigResult<&EnvironmentConfig> {
        self.environments
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEnvironment(name.to_string()))
    }

    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.testflight.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("testflight.endpoint is empty".into()));
        }
        if self.testflight.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "testflight.timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// TestFlight upload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestflightConfig {
    /// Upload endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API token. Overridable with `TESTFLIGHT_API_TOKEN`.
    #[serde(default)]
    pub api_token: String,

    /// Team token. Overridable with `TESTFLIGHT_TEAM_TOKEN`.
    #[serde(default)]
    pub team_token: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TestflightConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_token: String::new(),
            team_token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "http://testflightapp.com/api/builds.json".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Working tree configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitConfig {
    /// Skip the clean working tree check. `IGNORE_GIT` has the same effect.
    #[serde(default)]
    pub allow_dirty: bool,
}

/// A deployment environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Tester distribution list the build is released to.
    #[serde(default)]
    pub distribution_list: String,

    /// Notify testers. `None` defers to `NOTIFY`, then to `true`.
    pub notify: Option<bool>,

    /// Build deploy notes from the commit log instead of prompting.
    #[serde(default = "default_true")]
    pub autogenerate_notes: bool,

    /// Default artifact to upload.
    pub artifact: Option<PathBuf>,

    /// Default debug-symbol bundle to upload alongside the artifact.
    pub dsym: Option<PathBuf>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            distribution_list: String::new(),
            notify: None,
            autogenerate_notes: true,
            artifact: None,
            dsym: None,
        }
    }
}

fn default_true() -> bool {
    true
}
