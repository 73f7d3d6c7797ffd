//! Core types and traits for the feedkit reconciliation layer.
//!
//! This crate defines the domain model shared by every other feedkit crate:
//! the remote entities (`Post`, `User`, `Comment`), the classification of
//! remote fetch failures, and the `PostSource` capability trait the engine
//! consumes instead of a concrete HTTP client.
//!
//! No I/O happens here.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod source;
mod types;

pub use error::*;
pub use source::*;
pub use types::*;

// Re-export so implementors of `PostSource` use the same macro version.
pub use async_trait::async_trait;
