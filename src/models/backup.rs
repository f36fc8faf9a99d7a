//! Backup record model
//!
//! A backup record is metadata plus the raw exported snapshot text. Records
//! are produced by the export job; restore only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BackupId;

/// Lifecycle state of a backup record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackupStatus {
    #[default]
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "IN_PROGRESS")]
    InProgress,
    #[serde(alias = "COMPLETED")]
    Completed,
    #[serde(alias = "FAILED")]
    Failed,
}

impl BackupStatus {
    /// Only completed backups can be restored
    pub fn is_restorable(self) -> bool {
        self == Self::Completed
    }
}

impl fmt::Display for BackupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// A stored backup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRecord {
    /// Unique identifier
    pub id: BackupId,

    /// Original file name of the export, if any
    pub filename: Option<String>,

    pub status: BackupStatus,

    /// Serialized snapshot envelope
    pub content: Option<String>,

    pub created_at: DateTime<Utc>,

    pub completed_at: Option<DateTime<Utc>>,
}

impl BackupRecord {
    /// Create a completed record from exported snapshot text
    pub fn completed(id: BackupId, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            filename: None,
            status: BackupStatus::Completed,
            content: Some(content.into()),
            created_at: now,
            completed_at: Some(now),
        }
    }

    /// Size of the stored payload in bytes
    pub fn size_bytes(&self) -> usize {
        self.content.as_ref().map_or(0, |c| c.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_completed_is_restorable() {
        assert!(BackupStatus::Completed.is_restorable());
        assert!(!BackupStatus::Pending.is_restorable());
        assert!(!BackupStatus::InProgress.is_restorable());
        assert!(!BackupStatus::Failed.is_restorable());
    }

    #[test]
    fn test_status_serde() {
        let status: BackupStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, BackupStatus::InProgress);
        let status: BackupStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(status, BackupStatus::Completed);
    }
}
