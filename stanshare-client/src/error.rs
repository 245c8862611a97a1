//! Error types for the API client
//!
//! Uses thiserror for ergonomic error definitions.
//! Every networked call fails with `Transport`, `Http` or `Parse`;
//! nothing is retried here.

use thiserror::Error;

use crate::endpoints::{ApiVersion, Endpoint};

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, ClientError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or DNS failure, the request never got a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Malformed JSON on an otherwise successful response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint not exposed by the configured API version
    #[error("Endpoint {endpoint} is not available on the {version} API")]
    Unsupported {
        endpoint: Endpoint,
        version: ApiVersion,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Build an `Http` error from a status code and the raw response body.
    ///
    /// Uses the backend's `{"error": "..."}` message when the body carries one,
    /// otherwise falls back to a message naming the status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {status}"));

        ClientError::Http { status, message }
    }

    /// Status code for `Http` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}
