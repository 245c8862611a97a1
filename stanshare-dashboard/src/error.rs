//! Error types for the dashboard

use stanshare_client::ClientError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Backend call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// No view registered under this page name
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    /// Session storage could not be read or written
    #[error("Session store error: {0}")]
    Store(String),
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_is_transparent() {
        let err: DashboardError = ClientError::from_response(500, r#"{"error": "boom"}"#).into();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(DashboardError::UnknownPage("x.html".into()).to_string(), "Unknown page: x.html");
    }
}
