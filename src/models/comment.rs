//! Comment model
//!
//! Reader comments on posts. Replies point at their parent comment by
//! identity; the parent link is not enforced as a foreign key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CommentId, PostId};

open_enum! {
    /// Moderation state of a comment
    pub enum CommentStatus {
        Pending => "pending",
        Approved => "approved",
        Spam => "spam",
    }
    default = Pending;
}

/// A comment on a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: CommentId,

    /// Post commented on (must exist)
    pub post_id: PostId,

    /// Comment this one replies to
    pub parent_id: Option<CommentId>,

    pub author_name: String,

    pub author_email: Option<String>,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub status: CommentStatus,

    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Create a new top-level comment awaiting moderation
    pub fn new(id: CommentId, post_id: PostId, author_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            post_id,
            parent_id: None,
            author_name: author_name.into(),
            author_email: None,
            content: String::new(),
            status: CommentStatus::Pending,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}
