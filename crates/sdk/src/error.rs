//! Error types for the Semaphore SDK.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type SemaphoreResult<T> = Result<T, SemaphoreError>;

/// Error types that can occur when talking to the Semaphore API.
#[derive(Debug, thiserror::Error)]
pub enum SemaphoreError {
    /// The server could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Connection timeout.
    #[error("Request timed out")]
    Timeout,

    /// Authentication failed (invalid or expired token).
    #[error("Authentication failed (status {status}): {message}")]
    Authentication { status: u16, message: String },

    /// Resource not found.
    #[error("Resource not found (status 404): {message}")]
    NotFound { message: String },

    /// The server rejected the payload.
    #[error("Validation failed (status {status}): {message}")]
    Validation { status: u16, message: String },

    /// API returned some other error response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Other transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for SemaphoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_decode() {
            Self::InvalidInput(format!("Unexpected response body: {}", err))
        } else {
            Self::Http(err)
        }
    }
}

impl SemaphoreError {
    /// Create an error from a non-success status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(error_response) => error_response.error,
            Err(_) if body.trim().is_empty() => "<empty body>".to_string(),
            Err(_) => body.trim().to_string(),
        };

        match status {
            401 | 403 => Self::Authentication { status, message },
            404 => Self::NotFound { message },
            400 | 422 => Self::Validation { status, message },
            _ => Self::Api { status, message },
        }
    }

    /// HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::Validation { status, .. }
            | Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is an authentication failure.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Check if this is a not-found failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the server could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}

/// Error body shape returned by Semaphore.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_maps_auth() {
        let err = SemaphoreError::from_response(401, "");
        assert!(err.is_auth());
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_from_response_maps_forbidden_to_auth() {
        assert!(SemaphoreError::from_response(403, "forbidden").is_auth());
    }

    #[test]
    fn test_from_response_maps_not_found() {
        let err = SemaphoreError::from_response(404, "404 page not found");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("404 page not found"));
    }

    #[test]
    fn test_from_response_parses_error_body() {
        let err = SemaphoreError::from_response(400, r#"{"error":"Invalid inventory"}"#);
        match err {
            SemaphoreError::Validation { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid inventory");
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_response_keeps_status_and_body_for_server_errors() {
        let err = SemaphoreError::from_response(500, "boom");
        assert_eq!(err.to_string(), "API error (status 500): boom");
        assert!(!err.is_connectivity());
    }
}
