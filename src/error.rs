//! Custom error types for Press
//!
//! This module defines the error hierarchy for the restore engine and its
//! storage layer using thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::models::EntityKind;

/// The main error type for Press operations
#[derive(Error, Debug)]
pub enum PressError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A unique or foreign-key constraint rejected a write
    #[error("Constraint violation on {entity_type}: {detail}")]
    Constraint {
        entity_type: &'static str,
        detail: String,
    },

    /// The backup exists but is not in a restorable state
    #[error("Backup {backup_id} is not restorable (status: {status})")]
    InvalidState { backup_id: i64, status: String },

    /// The backup record has no content payload
    #[error("Backup {0} has no content")]
    MissingContent(i64),

    /// The backup content could not be parsed as a snapshot envelope
    #[error("Malformed snapshot in backup {backup_id}: {reason}")]
    MalformedSnapshot { backup_id: i64, reason: String },

    /// A single entity write failed partway through a restore
    #[error("Failed to restore {kind} {id}: {source}")]
    Write {
        kind: EntityKind,
        id: i64,
        #[source]
        source: Box<PressError>,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Coarse classification used by callers deciding how to report a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backup identity did not resolve
    Lookup,
    /// The backup is not restorable (status or missing content)
    State,
    /// The backup payload is malformed
    Content,
    /// A write failed after mutation started
    Write,
    /// Anything else (configuration, I/O outside a restore pass)
    Other,
}

impl PressError {
    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(entity_type: &'static str, detail: impl Into<String>) -> Self {
        Self::Constraint {
            entity_type,
            detail: detail.into(),
        }
    }

    /// Wrap a store error as a mid-restore write failure
    pub fn write_failed(kind: EntityKind, id: i64, source: PressError) -> Self {
        Self::Write {
            kind,
            id,
            source: Box::new(source),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound {
                entity_type: "Backup",
                ..
            } => ErrorKind::Lookup,
            Self::InvalidState { .. } | Self::MissingContent(_) => ErrorKind::State,
            Self::MalformedSnapshot { .. } => ErrorKind::Content,
            Self::Write { .. } => ErrorKind::Write,
            _ => ErrorKind::Other,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a constraint violation
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for PressError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PressError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Press operations
pub type PressResult<T> = Result<T, PressError>;
