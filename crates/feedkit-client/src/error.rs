//! Transport-level error types.

use feedkit_core::FetchError;
use thiserror::Error;

/// Errors raised by the HTTP post source before classification.
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport succeeded but the body was empty
    #[error("empty response body")]
    EmptyBody,

    /// Remote returned a non-success status
    #[error("HTTP status {code}")]
    Status {
        code: u16,
        body: String,
    },
}

impl SourceError {
    /// Check if a retry might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { code, .. } => (500..=599).contains(code),
            Self::Json(_) | Self::EmptyBody => false,
        }
    }

    /// Classify into the core taxonomy surfaced to the engine.
    #[must_use]
    pub fn to_fetch_error(&self) -> FetchError {
        match self {
            Self::Http(e) if e.is_connect() => FetchError::NoConnectivity,
            Self::EmptyBody | Self::Json(_) => FetchError::EmptyResponse,
            Self::Status { code, .. } => FetchError::other(format!("HTTP status {code}")),
            Self::Http(e) => FetchError::other(e.to_string()),
        }
    }
}

/// Result type for transport operations.
pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_retryability() {
        let server_err = SourceError::Status {
            code: 503,
            body: String::new(),
        };
        assert!(server_err.is_retryable());

        let client_err = SourceError::Status {
            code: 404,
            body: String::new(),
        };
        assert!(!client_err.is_retryable());
    }

    #[test]
    fn empty_body_classifies_as_empty_response() {
        assert_eq!(
            SourceError::EmptyBody.to_fetch_error(),
            FetchError::EmptyResponse
        );
    }

    #[test]
    fn status_classifies_as_other() {
        let err = SourceError::Status {
            code: 500,
            body: "oops".into(),
        };
        assert_eq!(err.to_fetch_error(), FetchError::other("HTTP status 500"));
    }
}
