//! Snapshot envelope reader
//!
//! Resolves a backup identity to a typed snapshot. Reading never mutates
//! anything; every failure here happens before restore touches the store.

use chrono::{DateTime, Utc};

use crate::error::{PressError, PressResult};
use crate::models::BackupId;
use crate::storage::BackupRepository;

use super::snapshot::{SnapshotData, SnapshotEnvelope};

/// A parsed, restorable snapshot
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub backup_id: BackupId,
    pub exported_at: Option<DateTime<Utc>>,
    pub export_type: Option<String>,
    pub data: SnapshotData,
}

/// Reads backup records into typed snapshots
pub struct SnapshotReader<'a> {
    backups: &'a BackupRepository,
}

impl<'a> SnapshotReader<'a> {
    pub fn new(backups: &'a BackupRepository) -> Self {
        Self { backups }
    }

    /// Load and validate the backup, then parse its content
    ///
    /// # Errors
    ///
    /// - `NotFound` if no backup has this identity
    /// - `InvalidState` if the backup is not completed
    /// - `MissingContent` if the backup has no payload
    /// - `MalformedSnapshot` if the payload is not a valid envelope
    pub fn read(&self, backup_id: BackupId) -> PressResult<Snapshot> {
        let record = self
            .backups
            .get(backup_id)?
            .ok_or_else(|| PressError::backup_not_found(backup_id.get().to_string()))?;

        if !record.status.is_restorable() {
            return Err(PressError::InvalidState {
                backup_id: backup_id.get(),
                status: record.status.to_string(),
            });
        }

        let content = record
            .content
            .as_deref()
            .ok_or(PressError::MissingContent(backup_id.get()))?;

        let envelope = parse_envelope(backup_id, content)?;
        tracing::debug!(
            backup = %backup_id,
            collections = ?envelope.data.contents(),
            "parsed snapshot"
        );

        Ok(Snapshot {
            backup_id,
            exported_at: envelope.exported_at,
            export_type: envelope.export_type,
            data: envelope.data,
        })
    }
}

/// Parse snapshot text into an envelope
///
/// The payload must be a JSON object with a `data` object; each collection
/// under `data` must match its entity projection.
pub fn parse_envelope(backup_id: BackupId, content: &str) -> PressResult<SnapshotEnvelope> {
    let malformed = |reason: String| PressError::MalformedSnapshot {
        backup_id: backup_id.get(),
        reason,
    };

    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    match value.get("data") {
        Some(serde_json::Value::Object(_)) => {}
        Some(_) => return Err(malformed("`data` is not an object".into())),
        None => return Err(malformed("missing `data` object".into())),
    }

    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
}
