//! Press - snapshot restore engine for a publishing platform
//!
//! This library rebuilds the live content graph (users, taxonomy, posts,
//! comments, site configuration) from an exported snapshot. Rows keep the
//! identities they were exported with, collections are written in
//! foreign-key order, and the site maintenance flag is held for the
//! duration of the restore.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Rows of the content graph and backup records
//! - `storage`: JSON file tables with constraint-checked writes
//! - `audit`: Append-only audit logging
//! - `backup`: Snapshot parsing and the restore engine
//! - `cli`: Command handlers for the `press` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use press::audit::AuditLogger;
//! use press::backup::RestoreEngine;
//! use press::config::paths::PressPaths;
//! use press::models::{BackupId, UserId};
//! use press::storage::{BackupRepository, Storage};
//!
//! let paths = PressPaths::new()?;
//! let mut storage = Storage::new(paths.clone())?;
//! storage.load_all()?;
//! let backups = BackupRepository::open(paths.backups_file())?;
//! let audit = AuditLogger::new(paths.audit_log());
//!
//! let stats = RestoreEngine::new(&storage, &backups, &audit)
//!     .restore(BackupId::new(42), UserId::new(9))?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use error::{ErrorKind, PressError, PressResult};
