//! Audit logging system for Press
//!
//! Records completed restores (and backup registrations) in an append-only
//! audit log. A restore that aborts partway writes no entry, so a missing
//! entry after an invocation is the signal that the restore did not finish.
//!
//! # Architecture
//!
//! - `AuditEntry`: a single log entry with timestamp, operation, entity,
//!   acting user and a JSON payload.
//! - `AuditLogger`: appends entries to the audit log file as line-delimited
//!   JSON (JSONL) and reads them back.
//!
//! # Example
//!
//! ```rust,ignore
//! use press::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::restore("42", actor, &stats, stats.summary())?)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
