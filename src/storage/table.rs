//! Generic keyed table backed by a JSON file
//!
//! Each entity kind lives in its own file as `{"rows": [...]}` and is held in
//! memory as a map keyed by identity. Writes update memory only; callers
//! persist with [`Table::save`].
//!
//! Two distinct create operations exist: [`Table::insert_new`] assigns the
//! next free identity, while [`Table::insert_with_id`] keeps the identity the
//! row already carries. Restore only ever uses the latter.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{PressError, PressResult};
use crate::models::{
    Ad, BackupId, BackupRecord, Category, Comment, Post, PostVersion, Redirect, SiteSettings, Tag,
    User,
};

use super::file_io::{read_json, write_json_atomic};

/// A row type that can live in a [`Table`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Ord + fmt::Display + From<i64> + Into<i64>;

    /// Name used in error messages
    const TYPE_NAME: &'static str;

    fn id(&self) -> Self::Id;

    fn set_id(&mut self, id: Self::Id);
}

macro_rules! impl_record {
    ($row:ty, $id:ty, $name:literal) => {
        impl Record for $row {
            type Id = $id;
            const TYPE_NAME: &'static str = $name;

            fn id(&self) -> Self::Id {
                self.id
            }

            fn set_id(&mut self, id: Self::Id) {
                self.id = id;
            }
        }
    };
}

impl_record!(User, crate::models::UserId, "User");
impl_record!(Category, crate::models::CategoryId, "Category");
impl_record!(Tag, crate::models::TagId, "Tag");
impl_record!(Post, crate::models::PostId, "Post");
impl_record!(PostVersion, crate::models::PostVersionId, "PostVersion");
impl_record!(Comment, crate::models::CommentId, "Comment");
impl_record!(SiteSettings, crate::models::SettingsId, "SiteSettings");
impl_record!(Ad, crate::models::AdId, "Ad");
impl_record!(Redirect, crate::models::RedirectId, "Redirect");
impl_record!(BackupRecord, BackupId, "Backup");

/// Whether an upsert created or updated its row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
}

#[derive(Deserialize)]
struct TableData<T> {
    rows: Vec<T>,
}

impl<T> Default for TableData<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

#[derive(Serialize)]
struct TableDataRef<'a, T> {
    rows: Vec<&'a T>,
}

/// In-memory table with JSON file persistence
pub struct Table<T: Record> {
    path: PathBuf,
    data: RwLock<BTreeMap<T::Id, T>>,
}

impl<T: Record> Table<T> {
    /// Create an empty table bound to a file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> PressResult<RwLockReadGuard<'_, BTreeMap<T::Id, T>>> {
        self.data
            .read()
            .map_err(|e| PressError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> PressResult<RwLockWriteGuard<'_, BTreeMap<T::Id, T>>> {
        self.data
            .write()
            .map_err(|e| PressError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load rows from disk, replacing what is in memory
    pub fn load(&self) -> PressResult<()> {
        let file_data: TableData<T> = read_json(&self.path)?;

        let mut data = self.write()?;
        data.clear();
        for row in file_data.rows {
            data.insert(row.id(), row);
        }

        Ok(())
    }

    /// Save rows to disk
    pub fn save(&self) -> PressResult<()> {
        let data = self.read()?;
        let file_data = TableDataRef {
            rows: data.values().collect(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a row by identity
    pub fn get(&self, id: T::Id) -> PressResult<Option<T>> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// Get all rows in identity order
    pub fn get_all(&self) -> PressResult<Vec<T>> {
        Ok(self.read()?.values().cloned().collect())
    }

    /// Check if a row exists
    pub fn exists(&self, id: T::Id) -> PressResult<bool> {
        Ok(self.read()?.contains_key(&id))
    }

    /// Count rows
    pub fn count(&self) -> PressResult<usize> {
        Ok(self.read()?.len())
    }

    /// Find the first row, other than `exclude`, matching a predicate
    pub fn find_other<F>(&self, exclude: T::Id, pred: F) -> PressResult<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self
            .read()?
            .values()
            .find(|row| row.id() != exclude && pred(row))
            .cloned())
    }

    /// Create a row with a freshly generated identity (max + 1)
    pub fn insert_new(&self, mut row: T) -> PressResult<T::Id> {
        let mut data = self.write()?;
        let next: i64 = match data.keys().next_back() {
            Some(last) => {
                let raw: i64 = (*last).into();
                raw + 1
            }
            None => 1,
        };
        let id = <T::Id as From<i64>>::from(next);
        row.set_id(id);
        data.insert(id, row);
        Ok(id)
    }

    /// Create a row keeping the identity it already carries
    pub fn insert_with_id(&self, row: T) -> PressResult<()> {
        let mut data = self.write()?;
        let id = row.id();
        if data.contains_key(&id) {
            return Err(PressError::Duplicate {
                entity_type: T::TYPE_NAME,
                identifier: id.to_string(),
            });
        }
        data.insert(id, row);
        Ok(())
    }

    /// Update the row with this identity, or create it with exactly this identity
    pub fn upsert(&self, row: T) -> PressResult<WriteOutcome> {
        let mut data = self.write()?;
        let outcome = if data.contains_key(&row.id()) {
            WriteOutcome::Updated
        } else {
            WriteOutcome::Created
        };
        data.insert(row.id(), row);
        Ok(outcome)
    }

    /// Apply a change to every row, returning how many rows were visited
    pub fn update_all<F>(&self, mut change: F) -> PressResult<usize>
    where
        F: FnMut(&mut T),
    {
        let mut data = self.write()?;
        for row in data.values_mut() {
            change(row);
        }
        Ok(data.len())
    }
}
