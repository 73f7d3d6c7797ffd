//! Fixtures for feedkit domain types.
//!
//! Factory functions for in-memory entities plus JSON bodies in the remote
//! wire shape (camelCase author/post fields), for mounting on mock servers.

use feedkit_core::{Comment, CommentId, Post, PostId, User, UserId};
use serde_json::{json, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Entity fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// Create a post with the given id and a derived title.
#[must_use]
pub fn post(id: u64) -> Post {
    Post {
        id: PostId(id),
        user_id: UserId(1),
        title: format!("post {id}"),
        body: format!("body of post {id}"),
    }
}

/// Create a post with an explicit title.
#[must_use]
pub fn titled_post(id: u64, title: &str) -> Post {
    Post {
        id: PostId(id),
        user_id: UserId(1),
        title: title.into(),
        body: format!("body of post {id}"),
    }
}

/// Create posts for a list of ids, preserving the given order.
#[must_use]
pub fn posts(ids: &[u64]) -> Vec<Post> {
    ids.iter().copied().map(post).collect()
}

/// Create a user with the given id.
#[must_use]
pub fn user(id: u64) -> User {
    User {
        id: UserId(id),
        name: format!("User {id}"),
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
    }
}

/// Create `count` comments belonging to `post_id`.
#[must_use]
pub fn comments(post_id: u64, count: u64) -> Vec<Comment> {
    (1..=count)
        .map(|n| Comment {
            id: CommentId(post_id * 100 + n),
            post_id: PostId(post_id),
            name: format!("comment {n}"),
            email: format!("commenter{n}@example.com"),
            body: format!("comment {n} on post {post_id}"),
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire-shaped JSON bodies
// ─────────────────────────────────────────────────────────────────────────────

/// JSON array of posts in remote wire shape, one per id, in order.
#[must_use]
pub fn posts_body(ids: &[u64]) -> Value {
    Value::Array(
        ids.iter()
            .map(|id| {
                json!({
                    "userId": 1,
                    "id": id,
                    "title": format!("post {id}"),
                    "body": format!("body of post {id}"),
                })
            })
            .collect(),
    )
}

/// JSON object for a single user in remote wire shape.
#[must_use]
pub fn user_body(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("User {id}"),
        "username": format!("user{id}"),
        "email": format!("user{id}@example.com"),
    })
}

/// JSON array of `count` comments for `post_id` in remote wire shape.
#[must_use]
pub fn comments_body(post_id: u64, count: u64) -> Value {
    Value::Array(
        (1..=count)
            .map(|n| {
                json!({
                    "postId": post_id,
                    "id": post_id * 100 + n,
                    "name": format!("comment {n}"),
                    "email": format!("commenter{n}@example.com"),
                    "body": format!("comment {n} on post {post_id}"),
                })
            })
            .collect(),
    )
}
