//! Backup restoration for Press
//!
//! Applies a snapshot to the live store in foreign-key order, upserting every
//! row under the identity it was exported with. Restore is a merge: entity
//! kinds the snapshot does not carry are left alone, and rows the snapshot
//! does not mention survive.
//!
//! The pass is not transactional across rows. A failed write stops the pass
//! where it is; rows written before it stay written, the maintenance flag is
//! cleared, and no audit entry is recorded.

use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span, warn};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::settings::RestoreSettings;
use crate::error::{PressError, PressResult};
use crate::models::{BackupId, EntityKind, UserId};
use crate::storage::{BackupRepository, Storage};

use super::gate::MaintenanceGate;
use super::reader::SnapshotReader;
use super::snapshot::{
    AdRecord, CategoryRecord, CommentRecord, PostRecord, RedirectRecord, SettingsRecord,
    SnapshotData, TagRecord, UserRecord,
};
use super::stats::RestoreStats;

/// Restore policy knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Mark users created without a credential as needing a password reset
    pub flag_new_users_for_reset: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            flag_new_users_for_reset: true,
        }
    }
}

impl From<&RestoreSettings> for RestoreOptions {
    fn from(settings: &RestoreSettings) -> Self {
        Self {
            flag_new_users_for_reset: settings.flag_new_users_for_reset,
        }
    }
}

/// Where a restore invocation is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestorePhase {
    Idle,
    /// Loading and parsing the backup; nothing has been written
    Reading,
    /// Writing rows with the maintenance flag held
    Restoring,
    /// Releasing the flag and recording the audit entry
    Finalizing,
    Succeeded,
    Failed,
}

/// Restores backups into the live store
pub struct RestoreEngine<'a> {
    storage: &'a Storage,
    backups: &'a BackupRepository,
    audit: &'a AuditLogger,
    options: RestoreOptions,
    phase: RestorePhase,
}

impl<'a> RestoreEngine<'a> {
    pub fn new(storage: &'a Storage, backups: &'a BackupRepository, audit: &'a AuditLogger) -> Self {
        Self {
            storage,
            backups,
            audit,
            options: RestoreOptions::default(),
            phase: RestorePhase::Idle,
        }
    }

    pub fn with_options(mut self, options: RestoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Phase reached by the most recent invocation
    pub fn phase(&self) -> RestorePhase {
        self.phase
    }

    /// Restore a backup on behalf of `actor`
    ///
    /// `actor` is recorded on the audit entry; checking that they may restore
    /// is the caller's job. Calling again with the same backup is safe.
    pub fn restore(&mut self, backup_id: BackupId, actor: UserId) -> PressResult<RestoreStats> {
        let span = info_span!("restore", backup = %backup_id, actor = %actor);
        let _enter = span.enter();

        match self.run(backup_id, actor) {
            Ok(stats) => {
                self.phase = RestorePhase::Succeeded;
                info!(total = stats.total(), "{}", stats.summary());
                Ok(stats)
            }
            Err(err) => {
                warn!(phase = ?self.phase, error = %err, "restore failed");
                self.phase = RestorePhase::Failed;
                Err(err)
            }
        }
    }

    fn run(&mut self, backup_id: BackupId, actor: UserId) -> PressResult<RestoreStats> {
        self.phase = RestorePhase::Reading;
        let snapshot = SnapshotReader::new(self.backups).read(backup_id)?;

        self.phase = RestorePhase::Restoring;
        let gate = MaintenanceGate::enter(self.storage)?;
        let stats = self.apply(snapshot.data)?;

        self.phase = RestorePhase::Finalizing;
        gate.release()?;
        self.audit.log(&AuditEntry::restore(
            backup_id.get().to_string(),
            actor,
            &stats,
            stats.summary(),
        )?)?;

        Ok(stats)
    }

    /// Write every collection present, parents before children
    fn apply(&self, data: SnapshotData) -> PressResult<RestoreStats> {
        let mut stats = RestoreStats::default();
        let now = Utc::now();

        if let Some(users) = data.users {
            self.restore_users(users, &mut stats)?;
        }
        if let Some(categories) = data.categories {
            self.restore_categories(categories, &mut stats)?;
        }
        if let Some(tags) = data.tags {
            self.restore_tags(tags, &mut stats)?;
        }
        if let Some(posts) = data.posts {
            self.restore_posts(posts, &mut stats)?;
        }
        if let Some(comments) = data.comments {
            self.restore_comments(comments, &mut stats)?;
        }
        if let Some(settings) = data.settings {
            self.restore_settings(settings, &mut stats)?;
        }
        if let Some(ads) = data.ads {
            self.restore_ads(ads, now, &mut stats)?;
        }
        if let Some(redirects) = data.redirects {
            self.restore_redirects(redirects, now, &mut stats)?;
        }

        Ok(stats)
    }

    fn restore_users(&self, users: Vec<UserRecord>, stats: &mut RestoreStats) -> PressResult<()> {
        debug!(count = users.len(), "restoring users");
        for record in users {
            let id = record.id;
            let existing = self
                .storage
                .users
                .get(id)
                .map_err(|e| PressError::write_failed(EntityKind::User, id.get(), e))?;
            let row = record.into_row(existing.as_ref(), self.options.flag_new_users_for_reset);
            if row.must_reset_password && existing.is_none() {
                warn!(user = %id, "restored user has no credential, flagged for reset");
            }
            written(EntityKind::User, id.get(), self.storage.upsert_user(row))?;
            stats.record(EntityKind::User);
        }
        Ok(())
    }

    fn restore_categories(
        &self,
        categories: Vec<CategoryRecord>,
        stats: &mut RestoreStats,
    ) -> PressResult<()> {
        debug!(count = categories.len(), "restoring categories");
        for record in categories {
            let id = record.id.get();
            written(
                EntityKind::Category,
                id,
                self.storage.upsert_category(record.into_row()),
            )?;
            stats.record(EntityKind::Category);
        }
        Ok(())
    }

    fn restore_tags(&self, tags: Vec<TagRecord>, stats: &mut RestoreStats) -> PressResult<()> {
        debug!(count = tags.len(), "restoring tags");
        for record in tags {
            let id = record.id.get();
            written(EntityKind::Tag, id, self.storage.upsert_tag(record.into_row()))?;
            stats.record(EntityKind::Tag);
        }
        Ok(())
    }

    /// Each post is finished (row, versions, tag set) before the next starts
    fn restore_posts(&self, posts: Vec<PostRecord>, stats: &mut RestoreStats) -> PressResult<()> {
        debug!(count = posts.len(), "restoring posts");
        for record in posts {
            let parts = record.into_parts();
            let post_id = parts.post.id;

            written(EntityKind::Post, post_id.get(), self.storage.upsert_post(parts.post))?;
            stats.record(EntityKind::Post);

            for version in parts.versions {
                let id = version.id.get();
                written(
                    EntityKind::PostVersion,
                    id,
                    self.storage.upsert_post_version(version),
                )?;
                stats.record(EntityKind::PostVersion);
            }

            if let Some(tag_ids) = parts.tags {
                let linked = written(
                    EntityKind::PostTag,
                    post_id.get(),
                    self.storage.replace_post_tags(post_id, &tag_ids),
                )?;
                stats.add(EntityKind::PostTag, linked);
            }
        }
        Ok(())
    }

    fn restore_comments(
        &self,
        comments: Vec<CommentRecord>,
        stats: &mut RestoreStats,
    ) -> PressResult<()> {
        debug!(count = comments.len(), "restoring comments");
        for record in ordered_comments(comments) {
            let id = record.id.get();
            written(
                EntityKind::Comment,
                id,
                self.storage.upsert_comment(record.into_row()),
            )?;
            stats.record(EntityKind::Comment);
        }
        Ok(())
    }

    /// The singleton is only written when the snapshot names its identity
    fn restore_settings(
        &self,
        settings: SettingsRecord,
        stats: &mut RestoreStats,
    ) -> PressResult<()> {
        let Some(mut row) = settings.into_row() else {
            warn!("snapshot settings carry no id, skipping");
            return Ok(());
        };

        // Settings are a singleton: land on the live row whatever id the export used
        let live = self
            .storage
            .settings
            .find_other(row.id, |_| true)
            .map_err(|e| PressError::write_failed(EntityKind::Settings, row.id.get(), e))?;
        if let Some(live) = live {
            warn!(
                snapshot = %row.id,
                live = %live.id,
                "snapshot settings id differs from the live row, writing under the live id"
            );
            row.id = live.id;
        }

        // The gate owns the flag until it is released
        row.maintenance_mode = true;
        let id = row.id.get();
        written(EntityKind::Settings, id, self.storage.upsert_settings(row))?;
        stats.record(EntityKind::Settings);
        Ok(())
    }

    fn restore_ads(
        &self,
        ads: Vec<AdRecord>,
        now: DateTime<Utc>,
        stats: &mut RestoreStats,
    ) -> PressResult<()> {
        debug!(count = ads.len(), "restoring ads");
        for record in ads {
            let id = record.id.get();
            written(EntityKind::Ad, id, self.storage.upsert_ad(record.into_row(now)))?;
            stats.record(EntityKind::Ad);
        }
        Ok(())
    }

    fn restore_redirects(
        &self,
        redirects: Vec<RedirectRecord>,
        now: DateTime<Utc>,
        stats: &mut RestoreStats,
    ) -> PressResult<()> {
        debug!(count = redirects.len(), "restoring redirects");
        for record in redirects {
            let id = record.id.get();
            written(
                EntityKind::Redirect,
                id,
                self.storage.upsert_redirect(record.into_row(now)),
            )?;
            stats.record(EntityKind::Redirect);
        }
        Ok(())
    }
}

/// Comments in ascending identity order, so parents tend to precede replies
fn ordered_comments(mut comments: Vec<CommentRecord>) -> Vec<CommentRecord> {
    comments.sort_by_key(|c| c.id);
    comments
}

fn written<T>(kind: EntityKind, id: i64, result: PressResult<T>) -> PressResult<T> {
    result.map_err(|e| PressError::write_failed(kind, id, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PressPaths;
    use crate::error::ErrorKind;
    use crate::models::{
        BackupRecord, BackupStatus, Category, CategoryId, CommentId, Post, PostId, Redirect,
        RedirectId, SettingsId, SiteSettings, Tag, TagId, User,
    };
    use serde_json::json;
    use tempfile::TempDir;

    struct TestEnv {
        _temp: TempDir,
        storage: Storage,
        backups: BackupRepository,
        audit: AuditLogger,
    }

    impl TestEnv {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let paths = PressPaths::with_base_dir(temp.path().to_path_buf());
            let storage = Storage::new(paths.clone()).unwrap();
            storage
                .upsert_settings(SiteSettings::new(SettingsId::new(1), "Press"))
                .unwrap();
            let backups = BackupRepository::open(paths.backups_file()).unwrap();
            let audit = AuditLogger::new(paths.audit_log());
            Self {
                _temp: temp,
                storage,
                backups,
                audit,
            }
        }

        fn store_backup(&self, id: i64, data: serde_json::Value) -> BackupId {
            let backup_id = BackupId::new(id);
            let content = json!({"exportType": "full", "data": data}).to_string();
            self.backups
                .insert(BackupRecord::completed(backup_id, content))
                .unwrap();
            backup_id
        }

        fn engine(&self) -> RestoreEngine<'_> {
            RestoreEngine::new(&self.storage, &self.backups, &self.audit)
        }

        fn restore(&self, backup_id: BackupId) -> PressResult<RestoreStats> {
            self.engine().restore(backup_id, UserId::new(9))
        }
    }

    fn post(id: i64, slug: &str, tags: &[i64]) -> serde_json::Value {
        json!({
            "id": id,
            "authorId": 1,
            "title": format!("Post {}", id),
            "slug": slug,
            "tags": tags.iter().map(|t| json!({"postId": id, "tagId": t})).collect::<Vec<_>>()
        })
    }

    #[test]
    fn test_restore_user_and_post() {
        let env = TestEnv::new();
        let backup_id = env.store_backup(
            42,
            json!({
                "users": [{"id": 1, "email": "a@x.com"}],
                "posts": [{"id": 7, "authorId": 1, "title": "Hi", "slug": "hi"}]
            }),
        );

        let mut engine = env.engine();
        let stats = engine.restore(backup_id, UserId::new(9)).unwrap();

        assert_eq!(
            stats,
            RestoreStats {
                users: 1,
                posts: 1,
                ..Default::default()
            }
        );
        assert_eq!(engine.phase(), RestorePhase::Succeeded);

        let entries = env.audit.restores_of("42").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor_id, Some(UserId::new(9)));
        assert_eq!(entries[0].after.as_ref().unwrap()["posts"], 1);

        assert!(!env.storage.maintenance_active().unwrap());
        let post = env.storage.posts.get(PostId::new(7)).unwrap().unwrap();
        assert_eq!(post.author_id, UserId::new(1));
    }

    #[test]
    fn test_unlisted_status_values_restore_verbatim() {
        let env = TestEnv::new();
        let backup_id = env.store_backup(
            5,
            json!({
                "users": [{"id": 1, "email": "a@x.com", "role": "SUBSCRIBER"}],
                "posts": [{
                    "id": 7,
                    "authorId": 1,
                    "title": "Soon",
                    "slug": "soon",
                    "status": "SCHEDULED"
                }],
                "comments": [{"id": 1, "postId": 7, "content": "hi", "status": "HIDDEN"}]
            }),
        );

        let stats = env.restore(backup_id).unwrap();
        assert_eq!(stats.total(), 3);

        let paths = PressPaths::with_base_dir(env._temp.path().to_path_buf());
        let mut reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();

        let post = reloaded.posts.get(PostId::new(7)).unwrap().unwrap();
        assert_eq!(post.status.as_str(), "SCHEDULED");
        assert!(!post.is_published());
        let user = reloaded.users.get(UserId::new(1)).unwrap().unwrap();
        assert_eq!(user.role.as_str(), "SUBSCRIBER");
        let comment = reloaded.comments.get(CommentId::new(1)).unwrap().unwrap();
        assert_eq!(comment.status.as_str(), "HIDDEN");
    }

    #[test]
    fn test_pending_backup_writes_nothing() {
        let env = TestEnv::new();
        let mut record = BackupRecord::completed(
            BackupId::new(3),
            json!({"data": {"users": [{"id": 1, "email": "a@x.com"}]}}).to_string(),
        );
        record.status = BackupStatus::Pending;
        env.backups.insert(record).unwrap();

        let mut engine = env.engine();
        let err = engine.restore(BackupId::new(3), UserId::new(9)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(engine.phase(), RestorePhase::Failed);
        assert_eq!(env.storage.users.count().unwrap(), 0);
        assert_eq!(env.audit.entry_count().unwrap(), 0);
        assert!(!env.storage.maintenance_active().unwrap());
    }

    #[test]
    fn test_unknown_backup_is_lookup_error() {
        let env = TestEnv::new();
        let err = env.restore(BackupId::new(404)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(env.audit.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_malformed_and_empty_content() {
        let env = TestEnv::new();
        env.backups
            .insert(BackupRecord::completed(BackupId::new(1), "{\"data\": 5}"))
            .unwrap();
        let mut empty = BackupRecord::completed(BackupId::new(2), "");
        empty.content = None;
        env.backups.insert(empty).unwrap();

        assert_eq!(
            env.restore(BackupId::new(1)).unwrap_err().kind(),
            ErrorKind::Content
        );
        assert_eq!(
            env.restore(BackupId::new(2)).unwrap_err().kind(),
            ErrorKind::State
        );
        assert!(!env.storage.maintenance_active().unwrap());
    }

    #[test]
    fn test_mid_pass_failure_keeps_earlier_posts() {
        let env = TestEnv::new();
        // A live post already owns the slug the third snapshot post uses
        env.storage
            .upsert_user(User::new(UserId::new(50), "live@x.com"))
            .unwrap();
        env.storage
            .upsert_post(Post::new(PostId::new(100), UserId::new(50), "Live", "taken"))
            .unwrap();

        let backup_id = env.store_backup(
            5,
            json!({
                "users": [{"id": 1, "email": "a@x.com"}],
                "tags": [
                    {"id": 1, "name": "One", "slug": "one"},
                    {"id": 2, "name": "Two", "slug": "two"}
                ],
                "posts": [
                    post(1, "p1", &[1, 2]),
                    post(2, "p2", &[2]),
                    post(3, "taken", &[1]),
                    post(4, "p4", &[1]),
                    post(5, "p5", &[2])
                ]
            }),
        );

        let mut engine = env.engine();
        let err = engine.restore(backup_id, UserId::new(9)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Write);
        assert!(matches!(
            err,
            PressError::Write {
                kind: EntityKind::Post,
                id: 3,
                ..
            }
        ));
        assert_eq!(engine.phase(), RestorePhase::Failed);

        assert!(env.storage.posts.exists(PostId::new(1)).unwrap());
        assert!(env.storage.posts.exists(PostId::new(2)).unwrap());
        assert!(!env.storage.posts.exists(PostId::new(3)).unwrap());
        assert!(!env.storage.posts.exists(PostId::new(4)).unwrap());
        assert_eq!(
            env.storage.post_tags.tags_for_post(PostId::new(1)).unwrap(),
            vec![TagId::new(1), TagId::new(2)]
        );
        assert_eq!(
            env.storage.post_tags.tags_for_post(PostId::new(2)).unwrap(),
            vec![TagId::new(2)]
        );

        assert_eq!(env.audit.entry_count().unwrap(), 0);
        assert!(!env.storage.maintenance_active().unwrap());
    }

    #[test]
    fn test_restore_is_idempotent() {
        let env = TestEnv::new();
        let backup_id = env.store_backup(
            1,
            json!({
                "users": [{"id": 1, "email": "a@x.com", "name": "Ada"}],
                "categories": [{"id": 2, "name": "News", "slug": "news"}],
                "tags": [{"id": 3, "name": "Rust", "slug": "rust"}],
                "posts": [{
                    "id": 4, "authorId": 1, "categoryId": 2, "title": "Hi", "slug": "hi",
                    "tags": [{"tag": {"id": 3}}],
                    "versions": [{"id": 40, "title": "Hi", "versionNumber": 1}]
                }],
                "comments": [{"id": 5, "postId": 4, "authorName": "Bo"}],
                "ads": [{"id": 6, "name": "Banner", "placement": "top",
                         "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}],
                "redirects": [{"id": 7, "source": "/a", "destination": "/b",
                               "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}]
            }),
        );

        let snapshot_state = |storage: &Storage| {
            json!({
                "users": storage.users.get_all().unwrap(),
                "posts": storage.posts.get_all().unwrap(),
                "versions": storage.post_versions.get_all().unwrap(),
                "tags": storage.post_tags.tags_for_post(PostId::new(4)).unwrap(),
                "comments": storage.comments.get_all().unwrap(),
                "ads": storage.ads.get_all().unwrap(),
                "redirects": storage.redirects.get_all().unwrap(),
            })
        };

        let first = env.restore(backup_id).unwrap();
        let state_after_first = snapshot_state(&env.storage);
        let second = env.restore(backup_id).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.total(), 9);
        assert_eq!(snapshot_state(&env.storage), state_after_first);
        assert_eq!(env.audit.restores_of("1").unwrap().len(), 2);
    }

    #[test]
    fn test_posts_resolve_authors_regardless_of_key_order() {
        let env = TestEnv::new();
        let backup_id = BackupId::new(8);
        // Posts appear before users in the raw text
        let content = r#"{"data":{
            "posts":[{"id":7,"authorId":1,"title":"Hi","slug":"hi"}],
            "users":[{"id":1,"email":"a@x.com"}]
        }}"#;
        env.backups
            .insert(BackupRecord::completed(backup_id, content))
            .unwrap();

        let stats = env.restore(backup_id).unwrap();
        assert_eq!(stats.posts, 1);
        assert_eq!(
            env.storage.posts.get(PostId::new(7)).unwrap().unwrap().author_id,
            UserId::new(1)
        );
    }

    #[test]
    fn test_tag_set_is_replaced() {
        let env = TestEnv::new();
        env.storage
            .upsert_user(User::new(UserId::new(1), "a@x.com"))
            .unwrap();
        for (id, slug) in [(1, "t1"), (2, "t2"), (3, "t3")] {
            env.storage
                .upsert_tag(Tag::new(TagId::new(id), slug, slug))
                .unwrap();
        }
        env.storage
            .upsert_post(Post::new(PostId::new(1), UserId::new(1), "Hi", "hi"))
            .unwrap();
        env.storage
            .replace_post_tags(PostId::new(1), &[TagId::new(3)])
            .unwrap();

        let backup_id = env.store_backup(1, json!({"posts": [post(1, "hi", &[1, 2])]}));
        let stats = env.restore(backup_id).unwrap();

        assert_eq!(stats.post_tags, 2);
        assert_eq!(
            env.storage.post_tags.tags_for_post(PostId::new(1)).unwrap(),
            vec![TagId::new(1), TagId::new(2)]
        );
    }

    #[test]
    fn test_post_without_tags_keeps_associations() {
        let env = TestEnv::new();
        env.storage
            .upsert_user(User::new(UserId::new(1), "a@x.com"))
            .unwrap();
        env.storage
            .upsert_tag(Tag::new(TagId::new(3), "t3", "t3"))
            .unwrap();
        env.storage
            .upsert_post(Post::new(PostId::new(1), UserId::new(1), "Hi", "hi"))
            .unwrap();
        env.storage
            .replace_post_tags(PostId::new(1), &[TagId::new(3)])
            .unwrap();

        let backup_id = env.store_backup(
            1,
            json!({"posts": [{"id": 1, "authorId": 1, "title": "Hello", "slug": "hi"}]}),
        );
        env.restore(backup_id).unwrap();

        assert_eq!(
            env.storage.posts.get(PostId::new(1)).unwrap().unwrap().title,
            "Hello"
        );
        assert_eq!(
            env.storage.post_tags.tags_for_post(PostId::new(1)).unwrap(),
            vec![TagId::new(3)]
        );
    }

    #[test]
    fn test_comments_are_ordered_by_id() {
        let comments: Vec<CommentRecord> = serde_json::from_value(json!([
            {"id": 5, "postId": 1, "parentId": 3},
            {"id": 3, "postId": 1, "parentId": null}
        ]))
        .unwrap();

        let ids: Vec<CommentId> = ordered_comments(comments).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CommentId::new(3), CommentId::new(5)]);
    }

    #[test]
    fn test_reply_before_parent_restores() {
        let env = TestEnv::new();
        let backup_id = env.store_backup(
            1,
            json!({
                "users": [{"id": 1, "email": "a@x.com"}],
                "posts": [{"id": 1, "authorId": 1, "title": "Hi", "slug": "hi"}],
                "comments": [
                    {"id": 5, "postId": 1, "parentId": 3, "authorName": "B"},
                    {"id": 3, "postId": 1, "parentId": null, "authorName": "A"}
                ]
            }),
        );

        let stats = env.restore(backup_id).unwrap();
        assert_eq!(stats.comments, 2);
        let reply = env.storage.comments.get(CommentId::new(5)).unwrap().unwrap();
        assert_eq!(reply.parent_id, Some(CommentId::new(3)));
    }

    #[test]
    fn test_settings_singleton_is_updated_not_duplicated() {
        let env = TestEnv::new();
        let backup_id = env.store_backup(
            1,
            json!({"settings": {"id": 1, "siteName": "Restored", "maintenanceMode": true}}),
        );

        let stats = env.restore(backup_id).unwrap();
        assert_eq!(stats.settings, 1);
        assert_eq!(env.storage.settings.count().unwrap(), 1);

        let settings = env.storage.settings.get(SettingsId::new(1)).unwrap().unwrap();
        assert_eq!(settings.site_name, "Restored");
        assert!(!settings.maintenance_mode);
    }

    #[test]
    fn test_settings_without_id_are_skipped() {
        let env = TestEnv::new();
        let backup_id = env.store_backup(1, json!({"settings": {"siteName": "Ghost"}}));

        let stats = env.restore(backup_id).unwrap();
        assert_eq!(stats.settings, 0);
        assert_eq!(env.storage.settings.count().unwrap(), 1);
        assert_eq!(
            env.storage
                .settings
                .get(SettingsId::new(1))
                .unwrap()
                .unwrap()
                .site_name,
            "Press"
        );
    }

    #[test]
    fn test_settings_with_other_id_update_live_row() {
        let env = TestEnv::new();
        let backup_id = env.store_backup(
            1,
            json!({
                "settings": {"id": 2, "siteName": "Other"},
                "redirects": [{"id": 1, "source": "/old", "destination": "/new"}]
            }),
        );

        let stats = env.restore(backup_id).unwrap();
        assert_eq!(stats.settings, 1);
        assert_eq!(stats.redirects, 1);

        assert_eq!(env.storage.settings.count().unwrap(), 1);
        assert!(!env.storage.settings.exists(SettingsId::new(2)).unwrap());
        let live = env.storage.settings.get(SettingsId::new(1)).unwrap().unwrap();
        assert_eq!(live.site_name, "Other");
        assert!(env.storage.redirects.exists(RedirectId::new(1)).unwrap());
        assert!(!env.storage.maintenance_active().unwrap());
    }

    #[test]
    fn test_absent_kinds_are_untouched() {
        let env = TestEnv::new();
        env.storage
            .upsert_category(Category::new(CategoryId::new(9), "Live", "live"))
            .unwrap();
        env.storage
            .upsert_redirect(Redirect::new(RedirectId::new(1), "/old", "/new"))
            .unwrap();

        let backup_id = env.store_backup(
            1,
            json!({"categories": [{"id": 2, "name": "News", "slug": "news"}]}),
        );
        let stats = env.restore(backup_id).unwrap();

        assert_eq!(stats.categories, 1);
        assert_eq!(stats.redirects, 0);
        assert!(env.storage.categories.exists(CategoryId::new(9)).unwrap());
        assert!(env.storage.categories.exists(CategoryId::new(2)).unwrap());
        assert!(env.storage.redirects.exists(RedirectId::new(1)).unwrap());
    }

    #[test]
    fn test_new_user_without_credential_is_flagged() {
        let env = TestEnv::new();
        let backup_id = env.store_backup(1, json!({"users": [{"id": 1, "email": "a@x.com"}]}));
        env.restore(backup_id).unwrap();

        let user = env.storage.users.get(UserId::new(1)).unwrap().unwrap();
        assert!(!user.has_credential());
        assert!(user.must_reset_password);

        let env = TestEnv::new();
        let backup_id = env.store_backup(1, json!({"users": [{"id": 1, "email": "a@x.com"}]}));
        env.engine()
            .with_options(RestoreOptions {
                flag_new_users_for_reset: false,
            })
            .restore(backup_id, UserId::new(9))
            .unwrap();
        let user = env.storage.users.get(UserId::new(1)).unwrap().unwrap();
        assert!(!user.must_reset_password);
    }

    #[test]
    fn test_phase_starts_idle() {
        let env = TestEnv::new();
        let engine = env.engine();
        assert_eq!(engine.phase(), RestorePhase::Idle);
    }
}
