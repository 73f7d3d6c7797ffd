//! Remote feed entities.
//!
//! These mirror the wire shapes of the externally-owned REST contract. Posts
//! are immutable once fetched; identity is the remote-assigned id.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Identifier of a post, assigned by the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl PostId {
    /// Get the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of a user, assigned by the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    /// Get the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of a comment, assigned by the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entities
// ─────────────────────────────────────────────────────────────────────────────

/// A remote content item with a stable integer id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Remote-assigned unique id.
    pub id: PostId,
    /// Id of the authoring user (wire field `userId`).
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
}

/// The author of a post. Fetched on demand for detail views, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Remote-assigned unique id.
    pub id: UserId,
    /// Full name.
    pub name: String,
    /// Handle.
    pub username: String,
    /// Contact email.
    pub email: String,
}

/// A comment on a post. Fetched on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Remote-assigned unique id.
    pub id: CommentId,
    /// Id of the post the comment belongs to (wire field `postId`).
    #[serde(rename = "postId")]
    pub post_id: PostId,
    /// Comment title line.
    pub name: String,
    /// Commenter email.
    pub email: String,
    /// Comment body.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_decodes_wire_shape() {
        let json = r#"{
            "userId": 7,
            "id": 42,
            "title": "qui est esse",
            "body": "est rerum tempore"
        }"#;

        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, PostId(42));
        assert_eq!(post.user_id, UserId(7));
        assert_eq!(post.title, "qui est esse");
    }

    #[test]
    fn post_roundtrips_author_field_name() {
        let post = Post {
            id: PostId(1),
            user_id: UserId(2),
            title: "t".into(),
            body: "b".into(),
        };

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["userId"], 2);
        assert!(value.get("user_id").is_none());
    }

    #[test]
    fn comment_decodes_wire_shape() {
        let json = r#"{
            "postId": 1,
            "id": 3,
            "name": "odio adipisci",
            "email": "Nikita@garfield.biz",
            "body": "quia molestiae reprehenderit"
        }"#;

        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.post_id, PostId(1));
        assert_eq!(comment.id, CommentId(3));
    }

    #[test]
    fn ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&PostId(9)).unwrap(), "9");
        let id: PostId = serde_json::from_str("9").unwrap();
        assert_eq!(id, PostId(9));
    }
}
