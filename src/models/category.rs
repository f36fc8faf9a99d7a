//! Category and Tag models
//!
//! Posts belong to at most one category and any number of tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CategoryId, TagId};

/// A post category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    pub name: String,

    /// URL slug (unique)
    pub slug: String,

    pub description: Option<String>,

    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Create a new category
    pub fn new(id: CategoryId, name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            description: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// A free-form post tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier
    pub id: TagId,

    pub name: String,

    /// URL slug (unique)
    pub slug: String,

    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Tag {
    /// Create a new tag
    pub fn new(id: TagId, name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}
