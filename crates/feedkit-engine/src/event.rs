//! Engine change events.

use feedkit_core::FetchError;

/// Event published after an engine state change.
///
/// Delivered over a `tokio::sync::broadcast` channel; subscribers that fall
/// behind lose the oldest events, so treat these as invalidation hints and
/// read current state through the snapshot API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A refresh began; `is_loading` is now true.
    RefreshStarted,
    /// A refresh completed and replaced the visible list.
    Refreshed {
        /// Number of posts now visible.
        visible: usize,
    },
    /// A refresh failed; the previous visible list was kept.
    RefreshFailed {
        /// Classified failure.
        error: FetchError,
    },
    /// The favorite set changed.
    FavoritesChanged,
    /// The visible list changed through a hide/reset mutation.
    VisibleChanged,
}
