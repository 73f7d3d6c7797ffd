//! Scriptable collaborators for engine tests.

use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use feedkit_core::{Comment, FetchError, FetchResult, Post, PostId, PostSource, User, UserId};
use feedkit_store::{MemoryStateStore, StateStore, StoreError};
use parking_lot::Mutex;

use crate::fixtures;

/// A `PostSource` whose results are scripted by the test.
///
/// One-shot results pushed with [`push_result`](Self::push_result) are
/// consumed in order; once the queue is empty every fetch returns the
/// fallback (settable via [`set_posts`](Self::set_posts) /
/// [`set_failure`](Self::set_failure), default empty list).
#[derive(Debug)]
pub struct StubPostSource {
    queued: Mutex<VecDeque<FetchResult<Vec<Post>>>>,
    fallback: Mutex<FetchResult<Vec<Post>>>,
    fetches: AtomicU64,
}

impl Default for StubPostSource {
    fn default() -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Ok(Vec::new())),
            fetches: AtomicU64::new(0),
        }
    }
}

impl StubPostSource {
    /// Create a stub that returns an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stub whose fallback is the given post list.
    #[must_use]
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let stub = Self::new();
        stub.set_posts(posts);
        stub
    }

    /// Set the fallback result to a post list.
    pub fn set_posts(&self, posts: Vec<Post>) {
        *self.fallback.lock() = Ok(posts);
    }

    /// Set the fallback result to a failure.
    pub fn set_failure(&self, error: FetchError) {
        *self.fallback.lock() = Err(error);
    }

    /// Enqueue a one-shot result consumed before the fallback applies.
    pub fn push_result(&self, result: FetchResult<Vec<Post>>) {
        self.queued.lock().push_back(result);
    }

    /// Number of `fetch_posts` calls made so far.
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PostSource for StubPostSource {
    async fn fetch_posts(&self) -> FetchResult<Vec<Post>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if let Some(result) = self.queued.lock().pop_front() {
            return result;
        }
        self.fallback.lock().clone()
    }

    async fn fetch_user(&self, user_id: UserId) -> FetchResult<User> {
        Ok(fixtures::user(user_id.get()))
    }

    async fn fetch_comments(&self, post_id: PostId) -> FetchResult<Vec<Comment>> {
        Ok(fixtures::comments(post_id.get(), 2))
    }
}

/// A state store that can be switched into failing modes.
///
/// With failing writes, reads still reflect the last successful write, which
/// makes it suitable for asserting persist-before-commit rollback behavior.
/// Failing reads exercise the fatal-initialization path.
#[derive(Debug, Default)]
pub struct FailingStateStore {
    inner: MemoryStateStore,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FailingStateStore {
    /// Create a store with reads and writes succeeding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn injected(op: &str) -> StoreError {
        StoreError::Io {
            path: "<failing-store>".into(),
            source: std::io::Error::other(format!("injected {op} failure")),
        }
    }

    fn write_error(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected("write"));
        }
        Ok(())
    }

    fn read_error(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::injected("read"));
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for FailingStateStore {
    async fn load_favorites(&self) -> Result<BTreeSet<PostId>, StoreError> {
        self.read_error()?;
        self.inner.load_favorites().await
    }

    async fn save_favorites(&self, favorites: &BTreeSet<PostId>) -> Result<(), StoreError> {
        self.write_error()?;
        self.inner.save_favorites(favorites).await
    }

    async fn load_hidden(&self) -> Result<BTreeSet<PostId>, StoreError> {
        self.read_error()?;
        self.inner.load_hidden().await
    }

    async fn save_hidden(&self, hidden: &BTreeSet<PostId>) -> Result<(), StoreError> {
        self.write_error()?;
        self.inner.save_hidden(hidden).await
    }

    async fn load_cached_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.read_error()?;
        self.inner.load_cached_posts().await
    }

    async fn save_cached_posts(&self, posts: &[Post]) -> Result<(), StoreError> {
        self.write_error()?;
        self.inner.save_cached_posts(posts).await
    }

    async fn clear_cached_posts(&self) -> Result<(), StoreError> {
        self.write_error()?;
        self.inner.clear_cached_posts().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_consumes_queue_then_fallback() {
        let stub = StubPostSource::with_posts(fixtures::posts(&[1]));
        stub.push_result(Err(FetchError::NoConnectivity));

        assert_eq!(
            stub.fetch_posts().await.unwrap_err(),
            FetchError::NoConnectivity
        );
        assert_eq!(stub.fetch_posts().await.unwrap(), fixtures::posts(&[1]));
        assert_eq!(stub.fetch_count(), 2);
    }

    #[tokio::test]
    async fn failing_store_keeps_last_persisted_value() {
        let store = FailingStateStore::new();
        let first: BTreeSet<_> = [PostId(1)].into();
        store.save_favorites(&first).await.unwrap();

        store.set_fail_writes(true);
        let second: BTreeSet<_> = [PostId(1), PostId(2)].into();
        assert!(store.save_favorites(&second).await.is_err());
        assert_eq!(store.load_favorites().await.unwrap(), first);
    }
}
