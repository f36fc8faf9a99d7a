//! Backup record store
//!
//! Holds exported snapshots with their status metadata in backups/backups.json.
//! The restore engine only reads from it; records are registered by the
//! export job or imported through the CLI.

use std::path::PathBuf;

use crate::error::PressResult;
use crate::models::{BackupId, BackupRecord};

use super::table::Table;

/// Repository for backup records
pub struct BackupRepository {
    table: Table<BackupRecord>,
}

impl BackupRepository {
    /// Create a repository bound to a file and load it
    pub fn open(path: PathBuf) -> PressResult<Self> {
        let repo = Self {
            table: Table::new(path),
        };
        repo.table.load()?;
        Ok(repo)
    }

    /// Get a backup by identity
    pub fn get(&self, id: BackupId) -> PressResult<Option<BackupRecord>> {
        self.table.get(id)
    }

    /// All backups, newest first
    pub fn list(&self) -> PressResult<Vec<BackupRecord>> {
        let mut records = self.table.get_all()?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    /// Store a record under a newly generated identity
    pub fn register(&self, record: BackupRecord) -> PressResult<BackupId> {
        let id = self.table.insert_new(record)?;
        self.table.save()?;
        Ok(id)
    }

    /// Store a record keeping its identity
    pub fn insert(&self, record: BackupRecord) -> PressResult<()> {
        self.table.insert_with_id(record)?;
        self.table.save()
    }

    /// Count records
    pub fn count(&self) -> PressResult<usize> {
        self.table.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BackupRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BackupRepository::open(temp_dir.path().join("backups.json")).unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_register_assigns_identity() {
        let (_temp, repo) = create_test_repo();
        let first = repo
            .register(BackupRecord::completed(BackupId::new(0), "{}"))
            .unwrap();
        let second = repo
            .register(BackupRecord::completed(BackupId::new(0), "{}"))
            .unwrap();

        assert_eq!(first, BackupId::new(1));
        assert_eq!(second, BackupId::new(2));
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_insert_keeps_identity_and_persists() {
        let (temp, repo) = create_test_repo();
        repo.insert(BackupRecord::completed(BackupId::new(42), "{}"))
            .unwrap();

        let reopened = BackupRepository::open(temp.path().join("backups.json")).unwrap();
        assert!(reopened.get(BackupId::new(42)).unwrap().is_some());
    }
}
