//! Environment variable overrides and per-invocation settings.
//!
//! Precedence for every upload setting is resolved here, once per call:
//! environment override, then explicit input, then default.

use std::fmt;

/// Overrides the notify flag. Only the exact string `FALSE` disables it.
pub const NOTIFY_VAR: &str = "NOTIFY";

/// Overrides the configured API token.
pub const API_TOKEN_VAR: &str = "TESTFLIGHT_API_TOKEN";

/// Overrides the configured team token.
pub const TEAM_TOKEN_VAR: &str = "TESTFLIGHT_TEAM_TOKEN";

/// Skips the clean working tree check when set to anything non-empty.
pub const IGNORE_GIT_VAR: &str = "IGNORE_GIT";

/// A snapshot of the recognised environment variables.
///
/// Empty or whitespace-only values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Parsed `NOTIFY`.
    pub notify: Option<bool>,
    /// `TESTFLIGHT_API_TOKEN`.
    pub api_token: Option<String>,
    /// `TESTFLIGHT_TEAM_TOKEN`.
    pub team_token: Option<String>,
    /// Whether `IGNORE_GIT` is set.
    pub ignore_git: bool,
}

impl EnvOverrides {
    /// Reads overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            notify: value(NOTIFY_VAR).map(|v| v != "FALSE"),
            api_token: value(API_TOKEN_VAR),
            team_token: value(TEAM_TOKEN_VAR),
            ignore_git: value(IGNORE_GIT_VAR).is_some(),
        }
    }
}

/// TestFlight credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// API token.
    pub api_token: String,
    /// Team token.
    pub team_token: String,
}

impl Credentials {
    /// Creates credentials from explicit tokens.
    #[must_use]
    pub fn new(api_token: impl Into<String>, team_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            team_token: team_token.into(),
        }
    }

    /// Returns a copy with any environment token overrides applied.
    #[must_use]
    pub fn with_overrides(&self, env: &EnvOverrides) -> Self {
        Self {
            api_token: env
                .api_token
                .clone()
                .unwrap_or_else(|| self.api_token.clone()),
            team_token: env
                .team_token
                .clone()
                .unwrap_or_else(|| self.team_token.clone()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(token: &str) -> &'static str {
            if token.is_empty() { "<unset>" } else { "<redacted>" }
        }

        f.debug_struct("Credentials")
            .field("api_token", &redact(&self.api_token))
            .field("team_token", &redact(&self.team_token))
            .finish()
    }
}

/// Settings for a single upload call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// Effective credentials.
    pub credentials: Credentials,
    /// Whether testers are notified.
    pub notify: bool,
}

impl UploadSettings {
    /// Resolves upload settings.
    ///
    /// `NOTIFY` wins over `notify` when set; `notify` wins over the default
    /// of `true`. Token overrides replace the configured tokens.
    #[must_use]
    pub fn resolve(credentials: &Credentials, notify: Option<bool>, env: &EnvOverrides) -> Self {
        Self {
            credentials: credentials.with_overrides(env),
            notify: env.notify.or(notify).unwrap_or(true),
        }
    }
}
