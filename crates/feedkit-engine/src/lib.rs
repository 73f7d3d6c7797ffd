//! The feedkit reconciliation engine.
//!
//! Merges the remote post list with two locally persisted id sets to produce
//! the visible feed:
//!
//! - **favorites**: posts the user marked, independent of the remote source
//! - **hidden**: posts the user soft-deleted locally; excluded from the
//!   visible list but never deleted remotely
//!
//! The engine owns the in-memory state, persists every mutation through a
//! [`StateStore`](feedkit_store::StateStore) before committing it, and
//! publishes change events over a broadcast channel. Collaborators are
//! injected at construction; there is no global state.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod engine;
mod event;

pub use engine::{EngineSnapshot, FeedEngine};
pub use event::EngineEvent;
