//! Fetch error classification.
//!
//! Remote failures are collapsed into three kinds the presentation layer can
//! message on directly. Transport-level detail (status codes, reqwest error
//! chains) lives in the client crate; by the time an error reaches the engine
//! it has been classified.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified failure of a remote fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// No network path to the remote source.
    #[error("no network connectivity")]
    NoConnectivity,

    /// Transport succeeded but the body was empty or undecodable.
    #[error("received an empty response")]
    EmptyResponse,

    /// Any other transport or protocol failure.
    #[error("{message}")]
    Other {
        /// Human-readable detail.
        message: String,
    },
}

impl FetchError {
    /// Build an [`FetchError::Other`] from any displayable detail.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Result type alias for remote fetches.
pub type FetchResult<T> = Result<T, FetchError>;
