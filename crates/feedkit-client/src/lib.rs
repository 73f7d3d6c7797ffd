//! HTTP implementation of the feedkit Remote Post Source.
//!
//! Talks to the externally-owned REST contract:
//!
//! - `GET /posts` → full post list
//! - `GET /users/{id}` → single user
//! - `GET /posts/{id}/comments` → comments of a post
//!
//! Transient transport failures (connect errors, timeouts, 5xx) are retried
//! with bounded exponential backoff before an error is surfaced. Errors are
//! classified into the [`feedkit_core::FetchError`] taxonomy at the crate
//! boundary; callers never see `reqwest` types.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod client;
mod config;
mod error;

pub use client::HttpPostSource;
pub use config::{ClientConfig, RetryConfig};
pub use error::{SourceError, SourceResult};
