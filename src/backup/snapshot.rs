//! Snapshot envelope and per-entity projections
//!
//! An export is a JSON envelope `{exportedAt, exportType, data: {...}}`. Each
//! collection under `data` is optional. Records here declare exactly the
//! scalar columns restore writes, plus the relationship fields restore
//! consumes separately (a post's `tags` and `versions`). Anything else in the
//! export (joined objects such as `author`, counters, reply trees) is dropped
//! at parse time.
//!
//! Timestamps are parsed into `DateTime<Utc>`. A missing or null timestamp
//! stays `None`, except on ads and redirects where it becomes the restore time.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::site::{default_posts_per_page, default_status_code};
use crate::models::{
    Ad, AdId, Category, CategoryId, Comment, CommentId, CommentStatus, Post, PostId, PostStatus,
    PostVersion, PostVersionId, Redirect, RedirectId, SettingsId, SiteSettings, Tag, TagId, User,
    UserId, UserRole,
};

/// Top-level export envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEnvelope {
    pub exported_at: Option<DateTime<Utc>>,
    pub export_type: Option<String>,
    pub data: SnapshotData,
}

/// The entity collections of a snapshot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotData {
    pub users: Option<Vec<UserRecord>>,
    pub categories: Option<Vec<CategoryRecord>>,
    pub tags: Option<Vec<TagRecord>>,
    pub posts: Option<Vec<PostRecord>>,
    pub comments: Option<Vec<CommentRecord>>,
    pub settings: Option<SettingsRecord>,
    pub ads: Option<Vec<AdRecord>>,
    pub redirects: Option<Vec<RedirectRecord>>,
}

impl SnapshotData {
    /// Collections present in the snapshot with their sizes, in restore order
    pub fn contents(&self) -> Vec<(&'static str, usize)> {
        fn len<T>(v: &Option<Vec<T>>) -> Option<usize> {
            v.as_ref().map(Vec::len)
        }

        [
            ("users", len(&self.users)),
            ("categories", len(&self.categories)),
            ("tags", len(&self.tags)),
            ("posts", len(&self.posts)),
            ("comments", len(&self.comments)),
            ("settings", self.settings.as_ref().map(|_| 1)),
            ("ads", len(&self.ads)),
            ("redirects", len(&self.redirects)),
        ]
        .into_iter()
        .filter_map(|(name, count)| count.map(|c| (name, c)))
        .collect()
    }

    /// Whether the snapshot carries no collections at all
    pub fn is_empty(&self) -> bool {
        self.contents().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    /// Credential hash; absent in exports that redact secrets
    pub password: Option<String>,
    /// Column name used by older exports
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Project onto a user row
    ///
    /// The credential is taken from the snapshot when present. Otherwise an
    /// existing user keeps theirs, and a new user gets an empty placeholder
    /// (marked for reset when `flag_for_reset` is set).
    pub fn into_row(self, existing: Option<&User>, flag_for_reset: bool) -> User {
        let credential = self.password.or(self.password_hash);
        let (password_hash, must_reset_password) = match (credential, existing) {
            (Some(hash), existing) => (hash, existing.is_some_and(|u| u.must_reset_password)),
            (None, Some(user)) => (user.password_hash.clone(), user.must_reset_password),
            (None, None) => (String::new(), flag_for_reset),
        };

        User {
            id: self.id,
            email: self.email,
            name: self.name,
            password_hash,
            role: self.role.unwrap_or_default(),
            bio: self.bio,
            avatar_url: self.avatar_url,
            must_reset_password,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CategoryRecord {
    pub fn into_row(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    pub id: TagId,
    pub name: String,
    pub slug: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TagRecord {
    pub fn into_row(self) -> Tag {
        Tag {
            id: self.id,
            name: self.name,
            slug: self.slug,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A reference from a post to one of its tags
///
/// Exports write the association in several shapes depending on how the
/// relation was loaded: a bare id, a join row, a nested join, or the tag
/// object itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagRef {
    Id(TagId),
    Join {
        #[serde(rename = "tagId")]
        tag_id: TagId,
    },
    Nested {
        tag: TagStub,
    },
    Tag {
        id: TagId,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagStub {
    pub id: TagId,
}

impl TagRef {
    pub fn tag_id(&self) -> TagId {
        match self {
            Self::Id(id) | Self::Join { tag_id: id } | Self::Tag { id } => *id,
            Self::Nested { tag } => tag.id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: PostStatus,
    pub featured_image: Option<String>,
    pub author_id: UserId,
    pub category_id: Option<CategoryId>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Tag set at capture time; `None` when the export did not include it
    pub tags: Option<Vec<TagRef>>,
    #[serde(default)]
    pub versions: Vec<PostVersionRecord>,
}

/// A post split into its scalar row and the relations restored alongside it
#[derive(Debug, Clone)]
pub struct PostParts {
    pub post: Post,
    pub versions: Vec<PostVersion>,
    pub tags: Option<Vec<TagId>>,
}

impl PostRecord {
    pub fn into_parts(self) -> PostParts {
        let post_id = self.id;
        let versions = self
            .versions
            .into_iter()
            .map(|v| v.into_row(post_id))
            .collect();
        let tags = self
            .tags
            .map(|refs| refs.iter().map(TagRef::tag_id).collect());

        PostParts {
            post: Post {
                id: self.id,
                title: self.title,
                slug: self.slug,
                excerpt: self.excerpt,
                content: self.content,
                status: self.status,
                featured_image: self.featured_image,
                author_id: self.author_id,
                category_id: self.category_id,
                published_at: self.published_at,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            versions,
            tags,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostVersionRecord {
    pub id: PostVersionId,
    pub post_id: Option<PostId>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_version_number")]
    pub version_number: i32,
    pub created_by_id: Option<UserId>,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_version_number() -> i32 {
    1
}

impl PostVersionRecord {
    /// Project onto a version row, defaulting the owner to the enclosing post
    pub fn into_row(self, parent: PostId) -> PostVersion {
        PostVersion {
            id: self.id,
            post_id: self.post_id.unwrap_or(parent),
            title: self.title,
            content: self.content,
            version_number: self.version_number,
            created_by_id: self.created_by_id,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: CommentId,
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    #[serde(default)]
    pub author_name: String,
    pub author_email: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: CommentStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CommentRecord {
    pub fn into_row(self) -> Comment {
        Comment {
            id: self.id,
            post_id: self.post_id,
            parent_id: self.parent_id,
            author_name: self.author_name,
            author_email: self.author_email,
            content: self.content,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    pub id: Option<SettingsId>,
    #[serde(default)]
    pub site_name: String,
    pub site_description: Option<String>,
    pub site_url: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: i32,
    #[serde(default)]
    pub maintenance_mode: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SettingsRecord {
    /// Project onto the settings row; `None` when the snapshot has no identity
    pub fn into_row(self) -> Option<SiteSettings> {
        let id = self.id?;
        Some(SiteSettings {
            id,
            site_name: self.site_name,
            site_description: self.site_description,
            site_url: self.site_url,
            logo_url: self.logo_url,
            posts_per_page: self.posts_per_page,
            maintenance_mode: self.maintenance_mode,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdRecord {
    pub id: AdId,
    pub name: String,
    pub placement: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AdRecord {
    pub fn into_row(self, now: DateTime<Utc>) -> Ad {
        Ad {
            id: self.id,
            name: self.name,
            placement: self.placement,
            code: self.code,
            active: self.active,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRecord {
    pub id: RedirectId,
    pub source: String,
    pub destination: String,
    #[serde(default = "default_status_code")]
    pub status_code: u16,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl RedirectRecord {
    pub fn into_row(self, now: DateTime<Utc>) -> Redirect {
        Redirect {
            id: self.id,
            source: self.source,
            destination: self.destination,
            status_code: self.status_code,
            active: self.active,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}
