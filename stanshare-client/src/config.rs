//! Client configuration
//!
//! Loaded from environment variables (`from_env`) or a TOML file (`load`).
//! Every field has a default; unparsable environment values fall back to it.

use std::path::Path;

use serde::Deserialize;

use crate::endpoints::{ApiVersion, EndpointMap};
use crate::error::{ClientError, Result};
use crate::format::ScoreThresholds;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// API client configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL; the endpoint table's default when unset
    pub base_url: Option<String>,

    /// Which backend endpoint table to use
    pub api_version: ApiVersion,

    /// Extraction status poll interval
    pub poll_interval_ms: u64,

    /// Quality score colour thresholds
    pub score_thresholds: ScoreThresholds,

    /// Log level (used by front ends that initialise logging)
    pub log_level: String,
    pub log_json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_version: ApiVersion::Current,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            score_thresholds: ScoreThresholds::default(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env_var(name).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl ClientConfig {
    /// Load configuration from `STANSHARE_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let thresholds = defaults.score_thresholds;

        Self {
            base_url: env_var("STANSHARE_API_URL"),

            api_version: env_parse("STANSHARE_API_VERSION", defaults.api_version),

            poll_interval_ms: env_parse("STANSHARE_POLL_INTERVAL_MS", defaults.poll_interval_ms),

            score_thresholds: ScoreThresholds {
                excellent: env_parse("STANSHARE_SCORE_EXCELLENT", thresholds.excellent),
                warning: env_parse("STANSHARE_SCORE_WARNING", thresholds.warning),
                caution: env_parse("STANSHARE_SCORE_CAUTION", thresholds.caution),
            },

            log_level: env_var("STANSHARE_LOG_LEVEL").unwrap_or(defaults.log_level),

            log_json: env_var("STANSHARE_LOG_JSON")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(defaults.log_json),
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Builder-style base URL override
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// Configured base URL, or the endpoint table's default
    pub fn resolved_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            EndpointMap::for_version(self.api_version)
                .default_base_url()
                .to_string()
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.resolved_base_url();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must be an http(s) URL, got '{base_url}'"
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ClientError::Config("poll_interval_ms must be positive".into()));
        }
        self.score_thresholds.validate()
    }
}
