//! Reconciliation engine.

use std::collections::BTreeSet;
use std::sync::Arc;

use feedkit_core::{FetchError, Post, PostId, PostSource};
use feedkit_store::{StateStore, StoreError};
use parking_lot::RwLock;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, instrument, warn};

use crate::event::EngineEvent;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Immutable snapshot of the engine state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineSnapshot {
    /// Posts currently visible, in remote order.
    pub visible: Vec<Post>,
    /// Ids the user marked as favorite.
    pub favorites: BTreeSet<PostId>,
    /// Ids the user hid locally.
    pub hidden: BTreeSet<PostId>,
    /// Whether a refresh is in flight.
    pub is_loading: bool,
    /// Classified failure of the most recent refresh, if it failed.
    pub last_error: Option<FetchError>,
}

#[derive(Debug, Default)]
struct EngineState {
    visible: Vec<Post>,
    favorites: BTreeSet<PostId>,
    hidden: BTreeSet<PostId>,
    is_loading: bool,
    last_error: Option<FetchError>,
}

/// Merges the remote post list with locally persisted favorite/hidden state.
///
/// Reads are lock-and-clone snapshots, safe from any thread. Mutations
/// serialize through an internal write gate and persist through the store
/// before committing to memory, so on return the store and the in-memory
/// state agree. `refresh` deliberately bypasses the gate: concurrent
/// refreshes race and the last response to arrive wins.
pub struct FeedEngine {
    source: Arc<dyn PostSource>,
    store: Arc<dyn StateStore>,
    state: RwLock<EngineState>,
    write_gate: Mutex<()>,
    event_tx: broadcast::Sender<EngineEvent>,
}

impl FeedEngine {
    /// Construct the engine, loading persisted state from the store.
    ///
    /// The visible list is seeded from the persisted post cache (minus the
    /// hidden set) so a restarted process can present stale-but-present data
    /// before its first refresh. No network call is made.
    ///
    /// # Errors
    /// Returns the store error if persisted state cannot be read. This is
    /// fatal: without a working store the engine cannot keep its sets
    /// consistent, so callers must abort startup rather than continue.
    pub async fn new(
        source: Arc<dyn PostSource>,
        store: Arc<dyn StateStore>,
    ) -> Result<Self, StoreError> {
        let favorites = store.load_favorites().await.map_err(fatal_store_error)?;
        let hidden = store.load_hidden().await.map_err(fatal_store_error)?;
        let cached = store.load_cached_posts().await.map_err(fatal_store_error)?;

        let visible: Vec<Post> = cached
            .into_iter()
            .filter(|p| !hidden.contains(&p.id))
            .collect();

        info!(
            favorites = favorites.len(),
            hidden = hidden.len(),
            cached_visible = visible.len(),
            "feed engine initialized"
        );

        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            source,
            store,
            state: RwLock::new(EngineState {
                visible,
                favorites,
                hidden,
                is_loading: false,
                last_error: None,
            }),
            write_gate: Mutex::new(()),
            event_tx,
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Read surface
    // ─────────────────────────────────────────────────────────────────────

    /// Posts currently visible, in remote order.
    #[must_use]
    pub fn visible_posts(&self) -> Vec<Post> {
        self.state.read().visible.clone()
    }

    /// Ids the user marked as favorite.
    #[must_use]
    pub fn favorites(&self) -> BTreeSet<PostId> {
        self.state.read().favorites.clone()
    }

    /// Ids the user hid locally.
    #[must_use]
    pub fn hidden(&self) -> BTreeSet<PostId> {
        self.state.read().hidden.clone()
    }

    /// Whether `post_id` is currently a favorite.
    #[must_use]
    pub fn is_favorite(&self, post_id: PostId) -> bool {
        self.state.read().favorites.contains(&post_id)
    }

    /// Whether a refresh is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    /// Classified failure of the most recent refresh, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<FetchError> {
        self.state.read().last_error.clone()
    }

    /// Full state snapshot in one lock acquisition.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let state = self.state.read();
        EngineSnapshot {
            visible: state.visible.clone(),
            favorites: state.favorites.clone(),
            hidden: state.hidden.clone(),
            is_loading: state.is_loading,
            last_error: state.last_error.clone(),
        }
    }

    /// Subscribe to engine change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Fetch the remote post list and rebuild the visible list.
    ///
    /// On success the fetched list, filtered by the hidden set and in remote
    /// order, replaces the visible list, and the raw fetched list is written
    /// to the post cache (a cache write failure is logged, not surfaced).
    /// On failure the previous visible list is kept and the classified error
    /// is recorded in `last_error`.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        self.state.write().is_loading = true;
        self.emit(EngineEvent::RefreshStarted);

        match self.source.fetch_posts().await {
            Ok(fetched) => {
                let visible_count = {
                    let mut guard = self.state.write();
                    let state = &mut *guard;
                    state.visible = fetched
                        .iter()
                        .filter(|p| !state.hidden.contains(&p.id))
                        .cloned()
                        .collect();
                    state.is_loading = false;
                    state.last_error = None;
                    state.visible.len()
                };

                if let Err(e) = self.store.save_cached_posts(&fetched).await {
                    warn!(error = %e, "failed to write post cache");
                }

                debug!(
                    fetched = fetched.len(),
                    visible = visible_count,
                    "refresh complete"
                );
                self.emit(EngineEvent::Refreshed {
                    visible: visible_count,
                });
            }
            Err(error) => {
                {
                    let mut state = self.state.write();
                    state.is_loading = false;
                    state.last_error = Some(error.clone());
                }
                warn!(error = %error, "refresh failed, keeping previous list");
                self.emit(EngineEvent::RefreshFailed { error });
            }
        }
    }

    /// Toggle the favorite marking of `post_id`, returning the new state.
    ///
    /// Membership in the visible list is unaffected; a favorite of a hidden
    /// post stays recorded.
    ///
    /// # Errors
    /// Returns the store error if persisting fails; the in-memory set is
    /// left at the last persisted value.
    #[instrument(skip(self))]
    pub async fn toggle_favorite(&self, post_id: PostId) -> Result<bool, StoreError> {
        let _gate = self.write_gate.lock().await;

        let mut favorites = self.state.read().favorites.clone();
        let now_favorite = if favorites.contains(&post_id) {
            favorites.remove(&post_id);
            false
        } else {
            favorites.insert(post_id);
            true
        };

        if let Err(e) = self.store.save_favorites(&favorites).await {
            warn!(%post_id, error = %e, "failed to persist favorites, keeping last persisted set");
            return Err(e);
        }
        self.state.write().favorites = favorites;

        debug!(%post_id, now_favorite, "favorite toggled");
        self.emit(EngineEvent::FavoritesChanged);
        Ok(now_favorite)
    }

    /// Hide `post_id` locally: remove it from the visible list and record it
    /// in the hidden set. Idempotent.
    ///
    /// # Errors
    /// Returns the store error if persisting fails; visible list and hidden
    /// set are left unchanged.
    #[instrument(skip(self))]
    pub async fn hide(&self, post_id: PostId) -> Result<(), StoreError> {
        let _gate = self.write_gate.lock().await;

        let mut hidden = self.state.read().hidden.clone();
        hidden.insert(post_id);
        if let Err(e) = self.store.save_hidden(&hidden).await {
            warn!(%post_id, error = %e, "failed to persist hidden set, keeping last persisted set");
            return Err(e);
        }

        {
            let mut guard = self.state.write();
            let state = &mut *guard;
            state.hidden = hidden;
            state.visible.retain(|p| p.id != post_id);
        }

        debug!(%post_id, "post hidden");
        self.emit(EngineEvent::VisibleChanged);
        Ok(())
    }

    /// Hide every currently visible post.
    ///
    /// # Errors
    /// Returns the store error if persisting fails; visible list and hidden
    /// set are left unchanged.
    #[instrument(skip(self))]
    pub async fn hide_all(&self) -> Result<(), StoreError> {
        let _gate = self.write_gate.lock().await;

        let hidden = {
            let state = self.state.read();
            let mut hidden = state.hidden.clone();
            hidden.extend(state.visible.iter().map(|p| p.id));
            hidden
        };
        if let Err(e) = self.store.save_hidden(&hidden).await {
            warn!(error = %e, "failed to persist hidden set, keeping last persisted set");
            return Err(e);
        }

        {
            let mut guard = self.state.write();
            let state = &mut *guard;
            state.hidden = hidden;
            state.visible.clear();
        }

        info!("all visible posts hidden");
        self.emit(EngineEvent::VisibleChanged);
        Ok(())
    }

    /// Clear the hidden set and the post cache, then refresh so the list
    /// repopulates from the remote source with no ids excluded.
    ///
    /// The only operation that refreshes internally; it returns once the
    /// refresh has completed (a refresh failure is recorded in `last_error`,
    /// not returned).
    ///
    /// # Errors
    /// Returns the store error if clearing persisted state fails; nothing is
    /// changed in memory in that case.
    #[instrument(skip(self))]
    pub async fn reset_hidden(&self) -> Result<(), StoreError> {
        {
            let _gate = self.write_gate.lock().await;

            if let Err(e) = self.store.save_hidden(&BTreeSet::new()).await {
                warn!(error = %e, "failed to persist cleared hidden set");
                return Err(e);
            }
            if let Err(e) = self.store.clear_cached_posts().await {
                warn!(error = %e, "failed to clear post cache");
                return Err(e);
            }

            {
                let mut guard = self.state.write();
                let state = &mut *guard;
                state.hidden.clear();
                state.visible.clear();
            }

            info!("hidden set reset");
            self.emit(EngineEvent::VisibleChanged);
        }

        self.refresh().await;
        Ok(())
    }

    fn emit(&self, event: EngineEvent) {
        // Nobody listening is fine.
        let _ = self.event_tx.send(event);
    }
}

fn fatal_store_error(e: StoreError) -> StoreError {
    error!(error = %e, "state store unavailable, engine cannot initialize");
    e
}
