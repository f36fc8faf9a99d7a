//! Backup restore for Press
//!
//! Reconstructs the live content graph from an exported snapshot.
//!
//! # Architecture
//!
//! - `SnapshotReader`: resolves a backup record and parses its envelope
//! - `RestoreEngine`: writes each collection in foreign-key order
//! - `MaintenanceGate`: holds the site maintenance flag while writing
//! - `RestoreStats`: per-kind counts, recorded on the audit entry
//!
//! # Restore Order
//!
//! Users, categories, tags, posts (with their versions and tag set), comments,
//! settings, ads, redirects. Every row keeps the identity it was exported
//! with, so references between rows resolve to restored rows.
//!
//! # Example
//!
//! ```rust,ignore
//! use press::audit::AuditLogger;
//! use press::backup::RestoreEngine;
//! use press::models::{BackupId, UserId};
//!
//! let mut engine = RestoreEngine::new(&storage, &backups, &audit);
//! let stats = engine.restore(BackupId::new(42), UserId::new(9))?;
//! println!("{}", stats.summary());
//! ```

mod gate;
mod reader;
mod restore;
mod snapshot;
mod stats;

pub use gate::MaintenanceGate;
pub use reader::{parse_envelope, Snapshot, SnapshotReader};
pub use restore::{RestoreEngine, RestoreOptions, RestorePhase};
pub use snapshot::{
    AdRecord, CategoryRecord, CommentRecord, PostParts, PostRecord, PostVersionRecord,
    RedirectRecord, SettingsRecord, SnapshotData, SnapshotEnvelope, TagRecord, TagRef, TagStub,
    UserRecord,
};
pub use stats::RestoreStats;
