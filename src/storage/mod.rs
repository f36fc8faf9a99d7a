//! Storage layer for Press
//!
//! Provides the live content store: one JSON table per entity kind plus the
//! post/tag join table. Table files are written atomically.
//!
//! The `upsert_*` methods on [`Storage`] are the write path used by restore.
//! They enforce the constraints a relational store would (unique columns and
//! foreign keys), keep the identity the row carries, and persist the table
//! before returning so every accepted write is durable on its own.

pub mod backups;
pub mod file_io;
pub mod init;
pub mod post_tags;
pub mod table;

pub use backups::BackupRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use post_tags::PostTagRepository;
pub use table::{Record, Table, WriteOutcome};

use std::collections::BTreeSet;

use crate::config::paths::PressPaths;
use crate::error::{PressError, PressResult};
use crate::models::{
    Ad, Category, Comment, EntityKind, Post, PostId, PostVersion, Redirect, SiteSettings, Tag,
    TagId, User,
};

/// Main storage coordinator that provides access to all tables
pub struct Storage {
    paths: PressPaths,
    pub users: Table<User>,
    pub categories: Table<Category>,
    pub tags: Table<Tag>,
    pub posts: Table<Post>,
    pub post_versions: Table<PostVersion>,
    pub post_tags: PostTagRepository,
    pub comments: Table<Comment>,
    pub settings: Table<SiteSettings>,
    pub ads: Table<Ad>,
    pub redirects: Table<Redirect>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: PressPaths) -> Result<Self, PressError> {
        paths.ensure_directories()?;

        Ok(Self {
            users: Table::new(paths.table_file(EntityKind::User)),
            categories: Table::new(paths.table_file(EntityKind::Category)),
            tags: Table::new(paths.table_file(EntityKind::Tag)),
            posts: Table::new(paths.table_file(EntityKind::Post)),
            post_versions: Table::new(paths.table_file(EntityKind::PostVersion)),
            post_tags: PostTagRepository::new(paths.table_file(EntityKind::PostTag)),
            comments: Table::new(paths.table_file(EntityKind::Comment)),
            settings: Table::new(paths.table_file(EntityKind::Settings)),
            ads: Table::new(paths.table_file(EntityKind::Ad)),
            redirects: Table::new(paths.table_file(EntityKind::Redirect)),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &PressPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), PressError> {
        self.users.load()?;
        self.categories.load()?;
        self.tags.load()?;
        self.posts.load()?;
        self.post_versions.load()?;
        self.post_tags.load()?;
        self.comments.load()?;
        self.settings.load()?;
        self.ads.load()?;
        self.redirects.load()?;
        Ok(())
    }

    // Constraint-checked writes

    /// Upsert a user; email is unique (case-insensitive)
    pub fn upsert_user(&self, user: User) -> PressResult<WriteOutcome> {
        if let Some(other) = self
            .users
            .find_other(user.id, |u| u.email.eq_ignore_ascii_case(&user.email))?
        {
            return Err(PressError::constraint(
                "User",
                format!("email '{}' already belongs to {}", user.email, other.id),
            ));
        }

        let outcome = self.users.upsert(user)?;
        self.users.save()?;
        Ok(outcome)
    }

    /// Upsert a category; slug is unique
    pub fn upsert_category(&self, category: Category) -> PressResult<WriteOutcome> {
        if let Some(other) = self
            .categories
            .find_other(category.id, |c| c.slug == category.slug)?
        {
            return Err(PressError::constraint(
                "Category",
                format!("slug '{}' already belongs to {}", category.slug, other.id),
            ));
        }

        let outcome = self.categories.upsert(category)?;
        self.categories.save()?;
        Ok(outcome)
    }

    /// Upsert a tag; slug is unique
    pub fn upsert_tag(&self, tag: Tag) -> PressResult<WriteOutcome> {
        if let Some(other) = self.tags.find_other(tag.id, |t| t.slug == tag.slug)? {
            return Err(PressError::constraint(
                "Tag",
                format!("slug '{}' already belongs to {}", tag.slug, other.id),
            ));
        }

        let outcome = self.tags.upsert(tag)?;
        self.tags.save()?;
        Ok(outcome)
    }

    /// Upsert a post; slug is unique, author and category must exist
    pub fn upsert_post(&self, post: Post) -> PressResult<WriteOutcome> {
        if !self.users.exists(post.author_id)? {
            return Err(PressError::constraint(
                "Post",
                format!("author_id references missing {}", post.author_id),
            ));
        }
        if let Some(category_id) = post.category_id {
            if !self.categories.exists(category_id)? {
                return Err(PressError::constraint(
                    "Post",
                    format!("category_id references missing {}", category_id),
                ));
            }
        }
        if let Some(other) = self.posts.find_other(post.id, |p| p.slug == post.slug)? {
            return Err(PressError::constraint(
                "Post",
                format!("slug '{}' already belongs to {}", post.slug, other.id),
            ));
        }

        let outcome = self.posts.upsert(post)?;
        self.posts.save()?;
        Ok(outcome)
    }

    /// Upsert a post version; its post must exist
    pub fn upsert_post_version(&self, version: PostVersion) -> PressResult<WriteOutcome> {
        if !self.posts.exists(version.post_id)? {
            return Err(PressError::constraint(
                "PostVersion",
                format!("post_id references missing {}", version.post_id),
            ));
        }

        let outcome = self.post_versions.upsert(version)?;
        self.post_versions.save()?;
        Ok(outcome)
    }

    /// Upsert a comment; its post must exist. The parent link is not checked.
    pub fn upsert_comment(&self, comment: Comment) -> PressResult<WriteOutcome> {
        if !self.posts.exists(comment.post_id)? {
            return Err(PressError::constraint(
                "Comment",
                format!("post_id references missing {}", comment.post_id),
            ));
        }

        let outcome = self.comments.upsert(comment)?;
        self.comments.save()?;
        Ok(outcome)
    }

    /// Upsert the settings singleton; a second row with another identity is rejected
    pub fn upsert_settings(&self, settings: SiteSettings) -> PressResult<WriteOutcome> {
        if let Some(other) = self.settings.find_other(settings.id, |_| true)? {
            return Err(PressError::constraint(
                "SiteSettings",
                format!(
                    "singleton already stored as {}, refusing {}",
                    other.id, settings.id
                ),
            ));
        }

        let outcome = self.settings.upsert(settings)?;
        self.settings.save()?;
        Ok(outcome)
    }

    /// Upsert an ad
    pub fn upsert_ad(&self, ad: Ad) -> PressResult<WriteOutcome> {
        let outcome = self.ads.upsert(ad)?;
        self.ads.save()?;
        Ok(outcome)
    }

    /// Upsert a redirect; source path is unique
    pub fn upsert_redirect(&self, redirect: Redirect) -> PressResult<WriteOutcome> {
        if let Some(other) = self
            .redirects
            .find_other(redirect.id, |r| r.source == redirect.source)?
        {
            return Err(PressError::constraint(
                "Redirect",
                format!("source '{}' already belongs to {}", redirect.source, other.id),
            ));
        }

        let outcome = self.redirects.upsert(redirect)?;
        self.redirects.save()?;
        Ok(outcome)
    }

    /// Replace a post's tag set with exactly `tag_ids`
    ///
    /// The post and every tag are checked before anything is deleted, so a
    /// rejected replacement leaves the post's previous associations intact.
    /// Returns the number of association rows created.
    pub fn replace_post_tags(&self, post_id: PostId, tag_ids: &[TagId]) -> PressResult<usize> {
        if !self.posts.exists(post_id)? {
            return Err(PressError::constraint(
                "PostTag",
                format!("post_id references missing {}", post_id),
            ));
        }

        let wanted: BTreeSet<TagId> = tag_ids.iter().copied().collect();
        for tag_id in &wanted {
            if !self.tags.exists(*tag_id)? {
                return Err(PressError::constraint(
                    "PostTag",
                    format!("tag_id references missing {}", tag_id),
                ));
            }
        }

        let linked = self.post_tags.replace(post_id, &wanted)?;
        self.post_tags.save()?;

        Ok(linked)
    }

    // Maintenance flag

    /// Set the maintenance flag on every settings row, returning the row count
    pub fn set_maintenance(&self, on: bool) -> PressResult<usize> {
        let rows = self.settings.update_all(|s| s.maintenance_mode = on)?;
        self.settings.save()?;
        Ok(rows)
    }

    /// Whether public request handling should treat the site as under maintenance
    pub fn maintenance_active(&self) -> PressResult<bool> {
        Ok(self
            .settings
            .get_all()?
            .iter()
            .any(|s| s.maintenance_mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, CommentId, PostId, SettingsId, TagId, UserId};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PressPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn seed_author(storage: &Storage) -> UserId {
        let id = UserId::new(1);
        storage.upsert_user(User::new(id, "a@x.com")).unwrap();
        id
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert_eq!(storage.settings.count().unwrap(), 0);
    }

    #[test]
    fn test_user_email_unique() {
        let (_temp, storage) = create_test_storage();
        seed_author(&storage);

        let err = storage
            .upsert_user(User::new(UserId::new(2), "A@X.com"))
            .unwrap_err();
        assert!(err.is_constraint());

        // Same identity may keep its own email
        let outcome = storage.upsert_user(User::new(UserId::new(1), "a@x.com")).unwrap();
        assert_eq!(outcome, WriteOutcome::Updated);
    }

    #[test]
    fn test_post_requires_author_and_category() {
        let (_temp, storage) = create_test_storage();

        let post = Post::new(PostId::new(7), UserId::new(1), "Hi", "hi");
        assert!(storage.upsert_post(post.clone()).unwrap_err().is_constraint());

        seed_author(&storage);
        let mut categorized = post.clone();
        categorized.category_id = Some(CategoryId::new(3));
        assert!(storage.upsert_post(categorized).unwrap_err().is_constraint());

        assert_eq!(storage.upsert_post(post).unwrap(), WriteOutcome::Created);
    }

    #[test]
    fn test_post_slug_unique() {
        let (_temp, storage) = create_test_storage();
        let author = seed_author(&storage);
        storage
            .upsert_post(Post::new(PostId::new(1), author, "One", "same"))
            .unwrap();

        let err = storage
            .upsert_post(Post::new(PostId::new(2), author, "Two", "same"))
            .unwrap_err();
        assert!(err.is_constraint());
        assert!(!storage.posts.exists(PostId::new(2)).unwrap());
    }

    #[test]
    fn test_writes_are_persisted() {
        let (temp_dir, storage) = create_test_storage();
        seed_author(&storage);

        let mut reopened =
            Storage::new(PressPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        reopened.load_all().unwrap();
        assert!(reopened.users.exists(UserId::new(1)).unwrap());
    }

    #[test]
    fn test_replace_post_tags_is_total() {
        let (_temp, storage) = create_test_storage();
        let author = seed_author(&storage);
        storage
            .upsert_post(Post::new(PostId::new(1), author, "Hi", "hi"))
            .unwrap();
        for (id, slug) in [(1, "t1"), (2, "t2"), (3, "t3")] {
            storage.upsert_tag(Tag::new(TagId::new(id), slug, slug)).unwrap();
        }

        storage
            .replace_post_tags(PostId::new(1), &[TagId::new(3)])
            .unwrap();
        let created = storage
            .replace_post_tags(PostId::new(1), &[TagId::new(1), TagId::new(2), TagId::new(1)])
            .unwrap();

        assert_eq!(created, 2);
        assert_eq!(
            storage.post_tags.tags_for_post(PostId::new(1)).unwrap(),
            vec![TagId::new(1), TagId::new(2)]
        );
    }

    #[test]
    fn test_replace_post_tags_rejects_missing_tag_without_deleting() {
        let (_temp, storage) = create_test_storage();
        let author = seed_author(&storage);
        storage
            .upsert_post(Post::new(PostId::new(1), author, "Hi", "hi"))
            .unwrap();
        storage.upsert_tag(Tag::new(TagId::new(1), "t1", "t1")).unwrap();
        storage
            .replace_post_tags(PostId::new(1), &[TagId::new(1)])
            .unwrap();

        let err = storage
            .replace_post_tags(PostId::new(1), &[TagId::new(99)])
            .unwrap_err();
        assert!(err.is_constraint());
        assert_eq!(
            storage.post_tags.tags_for_post(PostId::new(1)).unwrap(),
            vec![TagId::new(1)]
        );
    }

    #[test]
    fn test_comment_requires_post_but_not_parent() {
        let (_temp, storage) = create_test_storage();
        let mut reply = Comment::new(CommentId::new(5), PostId::new(1), "Bo");
        reply.parent_id = Some(CommentId::new(3));
        assert!(storage.upsert_comment(reply.clone()).unwrap_err().is_constraint());

        let author = seed_author(&storage);
        storage
            .upsert_post(Post::new(PostId::new(1), author, "Hi", "hi"))
            .unwrap();
        assert_eq!(storage.upsert_comment(reply).unwrap(), WriteOutcome::Created);
    }

    #[test]
    fn test_settings_singleton() {
        let (_temp, storage) = create_test_storage();
        storage
            .upsert_settings(SiteSettings::new(SettingsId::new(1), "Press"))
            .unwrap();

        let err = storage
            .upsert_settings(SiteSettings::new(SettingsId::new(2), "Other"))
            .unwrap_err();
        assert!(err.is_constraint());
        assert_eq!(storage.settings.count().unwrap(), 1);
    }

    #[test]
    fn test_maintenance_flag() {
        let (_temp, storage) = create_test_storage();
        assert!(!storage.maintenance_active().unwrap());
        assert_eq!(storage.set_maintenance(true).unwrap(), 0);

        storage
            .upsert_settings(SiteSettings::new(SettingsId::new(1), "Press"))
            .unwrap();
        assert_eq!(storage.set_maintenance(true).unwrap(), 1);
        assert!(storage.maintenance_active().unwrap());

        storage.set_maintenance(false).unwrap();
        assert!(!storage.maintenance_active().unwrap());
    }
}
