//! Test tooling shared across feedkit crates.
//!
//! - tracing initialization for test output
//! - fixtures for posts, users, comments, and their wire-shaped JSON bodies
//! - a scriptable [`StubPostSource`] and a fault-injecting
//!   [`FailingStateStore`] for engine tests

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod fixtures;
mod stubs;
mod tracing_config;

pub use fixtures::*;
pub use stubs::{FailingStateStore, StubPostSource};
pub use tracing_config::{init_test_tracing, init_test_tracing_with_filter};
