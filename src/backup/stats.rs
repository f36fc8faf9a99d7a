//! Per-entity restore counters

use serde::{Deserialize, Serialize};

use crate::models::EntityKind;

/// Rows written by a restore, per entity kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreStats {
    pub users: usize,
    pub categories: usize,
    pub tags: usize,
    pub posts: usize,
    pub post_versions: usize,
    /// Join rows created by tag reconciliation
    pub post_tags: usize,
    pub comments: usize,
    pub settings: usize,
    pub ads: usize,
    pub redirects: usize,
}

impl RestoreStats {
    /// Count one written row
    pub fn record(&mut self, kind: EntityKind) {
        self.add(kind, 1);
    }

    /// Count `n` written rows
    pub fn add(&mut self, kind: EntityKind, n: usize) {
        *self.slot(kind) += n;
    }

    /// Rows written for a kind
    pub fn get(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::User => self.users,
            EntityKind::Category => self.categories,
            EntityKind::Tag => self.tags,
            EntityKind::Post => self.posts,
            EntityKind::PostVersion => self.post_versions,
            EntityKind::PostTag => self.post_tags,
            EntityKind::Comment => self.comments,
            EntityKind::Settings => self.settings,
            EntityKind::Ad => self.ads,
            EntityKind::Redirect => self.redirects,
        }
    }

    fn slot(&mut self, kind: EntityKind) -> &mut usize {
        match kind {
            EntityKind::User => &mut self.users,
            EntityKind::Category => &mut self.categories,
            EntityKind::Tag => &mut self.tags,
            EntityKind::Post => &mut self.posts,
            EntityKind::PostVersion => &mut self.post_versions,
            EntityKind::PostTag => &mut self.post_tags,
            EntityKind::Comment => &mut self.comments,
            EntityKind::Settings => &mut self.settings,
            EntityKind::Ad => &mut self.ads,
            EntityKind::Redirect => &mut self.redirects,
        }
    }

    /// Total rows written
    pub fn total(&self) -> usize {
        EntityKind::all().iter().map(|k| self.get(*k)).sum()
    }

    /// One-line description, e.g. "Restored: 1 user, 2 posts"
    pub fn summary(&self) -> String {
        let parts: Vec<String> = EntityKind::all()
            .iter()
            .filter(|k| self.get(**k) > 0)
            .map(|k| {
                let n = self.get(*k);
                if n == 1 {
                    format!("1 {}", k)
                } else {
                    format!("{} {}", n, plural(*k))
                }
            })
            .collect();

        if parts.is_empty() {
            "Restored: nothing".to_string()
        } else {
            format!("Restored: {}", parts.join(", "))
        }
    }
}

fn plural(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::User => "users",
        EntityKind::Category => "categories",
        EntityKind::Tag => "tags",
        EntityKind::Post => "posts",
        EntityKind::PostVersion => "post versions",
        EntityKind::PostTag => "post tags",
        EntityKind::Comment => "comments",
        EntityKind::Settings => "settings",
        EntityKind::Ad => "ads",
        EntityKind::Redirect => "redirects",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_total() {
        let mut stats = RestoreStats::default();
        stats.record(EntityKind::User);
        stats.record(EntityKind::Post);
        stats.add(EntityKind::PostTag, 2);

        assert_eq!(stats.users, 1);
        assert_eq!(stats.posts, 1);
        assert_eq!(stats.get(EntityKind::PostTag), 2);
        assert_eq!(stats.total(), 4);
    }

    #[test]
    fn test_summary() {
        assert_eq!(RestoreStats::default().summary(), "Restored: nothing");

        let stats = RestoreStats {
            users: 1,
            posts: 2,
            ..Default::default()
        };
        assert_eq!(stats.summary(), "Restored: 1 user, 2 posts");
    }

    #[test]
    fn test_serializes_every_counter() {
        let json = serde_json::to_value(RestoreStats::default()).unwrap();
        assert_eq!(json.as_object().unwrap().len(), EntityKind::all().len());
    }
}
