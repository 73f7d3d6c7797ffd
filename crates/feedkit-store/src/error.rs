//! Error types for state stores.

use std::path::PathBuf;

use thiserror::Error;

/// Errors for state store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt store file {path}: {detail}")]
    Serialization { path: PathBuf, detail: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn serialization(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Serialization {
            path: path.into(),
            detail: detail.into(),
        }
    }
}
