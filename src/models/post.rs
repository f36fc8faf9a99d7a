//! Post, PostVersion and the post/tag join row
//!
//! A post is authored by one user, optionally filed under a category, tagged
//! through the `PostTag` join table, and keeps a history of versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CategoryId, PostId, PostVersionId, TagId, UserId};

open_enum! {
    /// Publication state of a post
    pub enum PostStatus {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
    default = Draft;
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: PostId,

    pub title: String,

    /// URL slug (unique)
    pub slug: String,

    pub excerpt: Option<String>,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub status: PostStatus,

    pub featured_image: Option<String>,

    /// Author (must reference an existing user)
    pub author_id: UserId,

    /// Category (must reference an existing category when set)
    pub category_id: Option<CategoryId>,

    pub published_at: Option<DateTime<Utc>>,

    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new draft post
    pub fn new(
        id: PostId,
        author_id: UserId,
        title: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            slug: slug.into(),
            excerpt: None,
            content: String::new(),
            status: PostStatus::Draft,
            featured_image: None,
            author_id,
            category_id: None,
            published_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// A saved revision of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostVersion {
    /// Unique identifier
    pub id: PostVersionId,

    /// Owning post (must exist)
    pub post_id: PostId,

    pub title: String,

    #[serde(default)]
    pub content: String,

    pub version_number: i32,

    /// Editor who saved this revision
    pub created_by_id: Option<UserId>,

    pub created_at: Option<DateTime<Utc>>,
}

/// One row of the post/tag many-to-many association
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostTag {
    pub post_id: PostId,
    pub tag_id: TagId,
}

impl PostTag {
    pub fn new(post_id: PostId, tag_id: TagId) -> Self {
        Self { post_id, tag_id }
    }
}
