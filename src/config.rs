//! Console Configuration
//!
//! Loaded from a JSON file. Every field except `api_base_url` has a
//! default. The bearer token is passed through as-is; it is never stored
//! or refreshed here.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides `token`
pub const TOKEN_ENV_VAR: &str = "CMS_TIMELINE_TOKEN";

/// Largest page size the backend accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON for this structure
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds an unusable value
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Configuration for talking to the CMS backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the backend API (required)
    pub api_base_url: String,

    /// Bearer token sent with every request (optional)
    #[serde(default)]
    pub token: Option<String>,

    /// Timeline page size (default: 10)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Bucket width for the status-code chart (default: 50)
    #[serde(default = "default_aggregation_interval")]
    pub aggregation_interval_minutes: u32,

    /// Paths kept in the latency ranking (default: 10)
    #[serde(default = "default_latency_top_n")]
    pub latency_top_n: usize,

    /// Users kept in the most-active ranking (default: 10)
    #[serde(default = "default_active_users_top_n")]
    pub active_users_top_n: usize,
}

fn default_page_size() -> u32 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_aggregation_interval() -> u32 {
    50
}

fn default_latency_top_n() -> usize {
    10
}

fn default_active_users_top_n() -> usize {
    10
}

impl ConsoleConfig {
    /// Config pointing at `api_base_url` with every default applied
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            token: None,
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
            aggregation_interval_minutes: default_aggregation_interval(),
            latency_top_n: default_latency_top_n(),
            active_users_top_n: default_active_users_top_n(),
        }
    }

    /// Load, apply the environment override, and validate
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: ConsoleConfig = serde_json::from_str(&content)?;
        config.apply_env_token(env::var(TOKEN_ENV_VAR).ok());
        config.validate()?;

        Ok(config)
    }

    /// Replace the token with a non-empty override
    pub fn apply_env_token(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
    }

    /// Check field ranges
    pub fn validate(&self) -> ConfigResult<()> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::invalid("api_base_url", "must not be empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "api_base_url",
                format!("'{}' is not an http(s) URL", base),
            ));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::invalid(
                "page_size",
                format!("must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("request_timeout_secs", "must be > 0"));
        }

        if self.aggregation_interval_minutes == 0 {
            return Err(ConfigError::invalid(
                "aggregation_interval_minutes",
                "must be > 0",
            ));
        }

        if self.latency_top_n == 0 {
            return Err(ConfigError::invalid("latency_top_n", "must be > 0"));
        }

        if self.active_users_top_n == 0 {
            return Err(ConfigError::invalid("active_users_top_n", "must be > 0"));
        }

        Ok(())
    }
}
