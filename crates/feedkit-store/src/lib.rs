//! Local state persistence for feedkit.
//!
//! The reconciliation engine tracks two id sets (favorites and hidden posts)
//! plus a cached copy of the last-fetched post list. This crate owns their
//! durability:
//!
//! - [`StateStore`]: the capability trait the engine consumes
//! - [`MemoryStateStore`]: lock-guarded maps, for tests and ephemeral use
//! - [`JsonStateStore`]: one JSON file per key under a data directory,
//!   surviving process restarts
//!
//! Writes are idempotent: persisting a value equal to what is already stored
//! is a no-op observable effect.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod json_store;
mod state_store;

pub use error::StoreError;
pub use json_store::JsonStateStore;
pub use state_store::{MemoryStateStore, StateStore};
