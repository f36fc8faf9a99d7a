//! Post/tag join table
//!
//! Stores the many-to-many association between posts and tags as a set of
//! `(post_id, tag_id)` pairs in post_tags.json.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PressError;
use crate::models::{PostId, PostTag, TagId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable join table structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PostTagData {
    rows: Vec<PostTag>,
}

/// Repository for post/tag associations
pub struct PostTagRepository {
    path: PathBuf,
    data: RwLock<BTreeSet<PostTag>>,
}

impl PostTagRepository {
    /// Create a new join table repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeSet::new()),
        }
    }

    /// Load associations from disk
    pub fn load(&self) -> Result<(), PressError> {
        let file_data: PostTagData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| PressError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        data.extend(file_data.rows);
        Ok(())
    }

    /// Save associations to disk
    pub fn save(&self) -> Result<(), PressError> {
        let data = self
            .data
            .read()
            .map_err(|e| PressError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = PostTagData {
            rows: data.iter().copied().collect(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Tags attached to a post, in tag identity order
    pub fn tags_for_post(&self, post_id: PostId) -> Result<Vec<TagId>, PressError> {
        let data = self
            .data
            .read()
            .map_err(|e| PressError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .iter()
            .filter(|row| row.post_id == post_id)
            .map(|row| row.tag_id)
            .collect())
    }

    /// Make `tags` the exact tag set of a post, returning how many links exist after
    ///
    /// The old links are dropped and the new ones added under one write lock,
    /// so readers see either the previous set or the new one.
    pub fn replace(&self, post_id: PostId, tags: &BTreeSet<TagId>) -> Result<usize, PressError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PressError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.retain(|row| row.post_id != post_id);
        data.extend(tags.iter().map(|tag_id| PostTag::new(post_id, *tag_id)));
        Ok(tags.len())
    }

    /// Count associations
    pub fn count(&self) -> Result<usize, PressError> {
        let data = self
            .data
            .read()
            .map_err(|e| PressError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, PostTagRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = PostTagRepository::new(temp_dir.path().join("post_tags.json"));
        (temp_dir, repo)
    }

    fn tags(ids: &[i64]) -> BTreeSet<TagId> {
        ids.iter().copied().map(TagId::new).collect()
    }

    #[test]
    fn test_replace_and_query() {
        let (_temp, repo) = create_test_repo();
        assert_eq!(repo.replace(PostId::new(1), &tags(&[11, 10])).unwrap(), 2);
        repo.replace(PostId::new(2), &tags(&[10])).unwrap();

        assert_eq!(
            repo.tags_for_post(PostId::new(1)).unwrap(),
            vec![TagId::new(10), TagId::new(11)]
        );
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_replace_leaves_other_posts() {
        let (_temp, repo) = create_test_repo();
        repo.replace(PostId::new(1), &tags(&[10, 11])).unwrap();
        repo.replace(PostId::new(2), &tags(&[10])).unwrap();

        assert_eq!(repo.replace(PostId::new(1), &tags(&[])).unwrap(), 0);
        assert!(repo.tags_for_post(PostId::new(1)).unwrap().is_empty());
        assert_eq!(repo.tags_for_post(PostId::new(2)).unwrap(), vec![TagId::new(10)]);
    }

    #[test]
    fn test_readers_never_see_partial_tag_set() {
        let (_temp, repo) = create_test_repo();
        let old = tags(&[1, 2, 3]);
        let new = tags(&[4, 5, 6]);
        repo.replace(PostId::new(1), &old).unwrap();

        let done = AtomicBool::new(false);
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for round in 0..200 {
                    let set = if round % 2 == 0 { &new } else { &old };
                    repo.replace(PostId::new(1), set).unwrap();
                }
                done.store(true, Ordering::SeqCst);
            });

            while !done.load(Ordering::SeqCst) {
                let seen: BTreeSet<TagId> = repo
                    .tags_for_post(PostId::new(1))
                    .unwrap()
                    .into_iter()
                    .collect();
                assert!(seen == old || seen == new, "partial tag set: {:?}", seen);
            }
        });
    }

    #[test]
    fn test_save_and_reload() {
        let (temp, repo) = create_test_repo();
        repo.replace(PostId::new(3), &tags(&[4])).unwrap();
        repo.save().unwrap();

        let reloaded = PostTagRepository::new(temp.path().join("post_tags.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.tags_for_post(PostId::new(3)).unwrap(), vec![TagId::new(4)]);
    }
}
