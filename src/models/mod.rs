//! Core data models for Press
//!
//! This module contains the rows of the live content graph (users, posts,
//! taxonomy, comments, site configuration) and the backup records that
//! snapshots are restored from.

#[macro_use]
mod open_enum;

pub mod backup;
pub mod category;
pub mod comment;
pub mod ids;
pub mod kind;
pub mod post;
pub mod site;
pub mod user;

pub use backup::{BackupRecord, BackupStatus};
pub use category::{Category, Tag};
pub use comment::{Comment, CommentStatus};
pub use ids::{
    AdId, BackupId, CategoryId, CommentId, PostId, PostVersionId, RedirectId, SettingsId, TagId,
    UserId,
};
pub use kind::EntityKind;
pub use post::{Post, PostStatus, PostTag, PostVersion};
pub use site::{Ad, Redirect, SiteSettings};
pub use user::{User, UserRole};
