//! Path management for Press
//!
//! Provides XDG-compliant path resolution for configuration, data, and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `PRESS_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/press` or `~/.config/press`
//! 3. Windows: `%APPDATA%\press`

use std::path::PathBuf;

use crate::error::PressError;
use crate::models::EntityKind;

/// Manages all paths used by Press
#[derive(Debug, Clone)]
pub struct PressPaths {
    /// Base directory for all Press data
    base_dir: PathBuf,
}

impl PressPaths {
    /// Create a new PressPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, PressError> {
        let base_dir = if let Ok(custom) = std::env::var("PRESS_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create PressPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/press/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding the live tables
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory holding backup records
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the table file for an entity kind
    pub fn table_file(&self, kind: EntityKind) -> PathBuf {
        self.data_dir().join(kind.file_name())
    }

    /// Get the path to the backup record index
    pub fn backups_file(&self) -> PathBuf {
        self.backup_dir().join("backups.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), PressError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PressError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PressError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| PressError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, PressError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("press"));
    }
    let home = std::env::var("HOME")
        .map_err(|_| PressError::Config("Could not determine HOME directory".into()))?;
    Ok(PathBuf::from(home).join(".config").join("press"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, PressError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| PressError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("press"))
}
