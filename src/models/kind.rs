//! Entity kinds covered by backup and restore

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every entity kind in the content graph
///
/// The declaration order is the foreign-key-safe restore order: no kind
/// references a kind that appears after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Category,
    Tag,
    Post,
    PostVersion,
    PostTag,
    Comment,
    Settings,
    Ad,
    Redirect,
}

impl EntityKind {
    /// All kinds in restore order
    pub fn all() -> &'static [EntityKind] {
        &[
            Self::User,
            Self::Category,
            Self::Tag,
            Self::Post,
            Self::PostVersion,
            Self::PostTag,
            Self::Comment,
            Self::Settings,
            Self::Ad,
            Self::Redirect,
        ]
    }

    /// Capitalized name used in storage error messages
    pub fn type_name(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Category => "Category",
            Self::Tag => "Tag",
            Self::Post => "Post",
            Self::PostVersion => "PostVersion",
            Self::PostTag => "PostTag",
            Self::Comment => "Comment",
            Self::Settings => "SiteSettings",
            Self::Ad => "Ad",
            Self::Redirect => "Redirect",
        }
    }

    /// File name of the table backing this kind
    pub fn file_name(self) -> &'static str {
        match self {
            Self::User => "users.json",
            Self::Category => "categories.json",
            Self::Tag => "tags.json",
            Self::Post => "posts.json",
            Self::PostVersion => "post_versions.json",
            Self::PostTag => "post_tags.json",
            Self::Comment => "comments.json",
            Self::Settings => "settings.json",
            Self::Ad => "ads.json",
            Self::Redirect => "redirects.json",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::User => "user",
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Post => "post",
            Self::PostVersion => "post version",
            Self::PostTag => "post tag",
            Self::Comment => "comment",
            Self::Settings => "settings",
            Self::Ad => "ad",
            Self::Redirect => "redirect",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_order() {
        let all = EntityKind::all();
        let pos = |k| all.iter().position(|x| *x == k).unwrap();
        assert!(pos(EntityKind::User) < pos(EntityKind::Post));
        assert!(pos(EntityKind::Category) < pos(EntityKind::Post));
        assert!(pos(EntityKind::Tag) < pos(EntityKind::PostTag));
        assert!(pos(EntityKind::Post) < pos(EntityKind::Comment));

        let mut sorted = all.to_vec();
        sorted.sort();
        assert_eq!(sorted, all);
    }

    #[test]
    fn test_file_names_unique() {
        let mut names: Vec<_> = EntityKind::all().iter().map(|k| k.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), EntityKind::all().len());
    }
}
