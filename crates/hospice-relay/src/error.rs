//! Error types for outbound relay calls.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for relay operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for relay operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote service answered with a non-success status.
    #[error("Remote service returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// The client was built without configuration.
    #[error("Relay client is not configured")]
    Disabled,
}

impl Error {
    /// Returns whether the client is disabled rather than failing.
    #[inline]
    pub fn is_disabled(&self) -> bool {
        matches!(self, Error::Disabled)
    }

    /// Returns whether the call timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Reqwest(err) if err.is_timeout())
    }

    /// Returns the remote status code, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Reqwest(err) => err.status(),
            _ => None,
        }
    }
}

/// Maps non-success responses to [`Error::Api`], keeping the body for logs.
pub(crate) async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Api { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_status() {
        let error = Error::Api {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: "invalid tracking number".to_owned(),
        };
        assert_eq!(error.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(error.to_string().contains("invalid tracking number"));
        assert!(!error.is_disabled());
    }

    #[test]
    fn disabled_has_no_status() {
        assert!(Error::Disabled.is_disabled());
        assert_eq!(Error::Disabled.status(), None);
        assert!(!Error::Disabled.is_timeout());
    }
}
