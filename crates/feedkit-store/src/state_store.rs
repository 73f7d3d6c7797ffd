//! State store interface and in-memory implementation.

use std::collections::BTreeSet;

use async_trait::async_trait;
use feedkit_core::{Post, PostId};
use parking_lot::RwLock;

use crate::error::StoreError;

/// Durable persistence of the engine's local state.
///
/// Implementations must survive repeated writes of the same value without an
/// observable effect and must return empty sets on first run.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the persisted favorite ids.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    async fn load_favorites(&self) -> Result<BTreeSet<PostId>, StoreError>;

    /// Persist the favorite ids.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    async fn save_favorites(&self, favorites: &BTreeSet<PostId>) -> Result<(), StoreError>;

    /// Load the persisted hidden ids.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    async fn load_hidden(&self) -> Result<BTreeSet<PostId>, StoreError>;

    /// Persist the hidden ids.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    async fn save_hidden(&self, hidden: &BTreeSet<PostId>) -> Result<(), StoreError>;

    /// Load the cached copy of the last-fetched post list.
    ///
    /// Returns an empty list when no cache has been written yet.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    async fn load_cached_posts(&self) -> Result<Vec<Post>, StoreError>;

    /// Persist the raw last-fetched post list.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    async fn save_cached_posts(&self, posts: &[Post]) -> Result<(), StoreError>;

    /// Drop the cached post list.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    async fn clear_cached_posts(&self) -> Result<(), StoreError>;
}

/// In-memory state store.
///
/// Suitable for tests and ephemeral sessions; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    favorites: RwLock<BTreeSet<PostId>>,
    hidden: RwLock<BTreeSet<PostId>>,
    cached_posts: RwLock<Vec<Post>>,
}

impl MemoryStateStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load_favorites(&self) -> Result<BTreeSet<PostId>, StoreError> {
        Ok(self.favorites.read().clone())
    }

    async fn save_favorites(&self, favorites: &BTreeSet<PostId>) -> Result<(), StoreError> {
        *self.favorites.write() = favorites.clone();
        Ok(())
    }

    async fn load_hidden(&self) -> Result<BTreeSet<PostId>, StoreError> {
        Ok(self.hidden.read().clone())
    }

    async fn save_hidden(&self, hidden: &BTreeSet<PostId>) -> Result<(), StoreError> {
        *self.hidden.write() = hidden.clone();
        Ok(())
    }

    async fn load_cached_posts(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.cached_posts.read().clone())
    }

    async fn save_cached_posts(&self, posts: &[Post]) -> Result<(), StoreError> {
        *self.cached_posts.write() = posts.to_vec();
        Ok(())
    }

    async fn clear_cached_posts(&self) -> Result<(), StoreError> {
        self.cached_posts.write().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use feedkit_core::UserId;

    use super::*;

    fn post(id: u64) -> Post {
        Post {
            id: PostId(id),
            user_id: UserId(1),
            title: format!("post {id}"),
            body: "body".into(),
        }
    }

    #[tokio::test]
    async fn starts_empty() {
        let store = MemoryStateStore::new();
        assert!(store.load_favorites().await.unwrap().is_empty());
        assert!(store.load_hidden().await.unwrap().is_empty());
        assert!(store.load_cached_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn saves_and_loads_sets() {
        let store = MemoryStateStore::new();
        let favorites: BTreeSet<_> = [PostId(1), PostId(3)].into();

        store.save_favorites(&favorites).await.unwrap();
        assert_eq!(store.load_favorites().await.unwrap(), favorites);

        let hidden: BTreeSet<_> = [PostId(2)].into();
        store.save_hidden(&hidden).await.unwrap();
        assert_eq!(store.load_hidden().await.unwrap(), hidden);
    }

    #[tokio::test]
    async fn post_cache_roundtrip_and_clear() {
        let store = MemoryStateStore::new();
        let posts = vec![post(1), post(2)];

        store.save_cached_posts(&posts).await.unwrap();
        assert_eq!(store.load_cached_posts().await.unwrap(), posts);

        store.clear_cached_posts().await.unwrap();
        assert!(store.load_cached_posts().await.unwrap().is_empty());
    }
}
