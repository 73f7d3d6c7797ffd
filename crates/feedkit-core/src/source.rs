//! The Remote Post Source capability.
//!
//! The engine consumes this trait instead of a concrete HTTP client so that
//! tests can script responses and so the transport can be swapped without
//! touching reconciliation logic.

use async_trait::async_trait;

use crate::{Comment, FetchResult, Post, PostId, User, UserId};

/// Read access to the externally-owned post feed.
///
/// Implementations are expected to be cheap to share (`Arc`) and safe to call
/// from any task.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch the current full post list, in remote order.
    ///
    /// # Errors
    /// Returns a classified [`FetchError`](crate::FetchError) on any
    /// transport or decoding failure.
    async fn fetch_posts(&self) -> FetchResult<Vec<Post>>;

    /// Fetch a single user by id.
    ///
    /// # Errors
    /// Returns a classified [`FetchError`](crate::FetchError) on any
    /// transport or decoding failure.
    async fn fetch_user(&self, user_id: UserId) -> FetchResult<User>;

    /// Fetch the comments of a post, in remote order.
    ///
    /// # Errors
    /// Returns a classified [`FetchError`](crate::FetchError) on any
    /// transport or decoding failure.
    async fn fetch_comments(&self, post_id: PostId) -> FetchResult<Vec<Comment>>;
}
