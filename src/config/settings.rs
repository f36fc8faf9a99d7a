//! Operator settings for Press
//!
//! Controls restore policy and default logging. Stored as `config.json` in
//! the base directory; every field has a default so older files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::PressPaths;
use crate::error::PressError;

/// Restore policy settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreSettings {
    /// Mark users restored without a credential as needing a password reset
    #[serde(default = "default_true")]
    pub flag_new_users_for_reset: bool,
}

impl Default for RestoreSettings {
    fn default() -> Self {
        Self {
            flag_new_users_for_reset: true,
        }
    }
}

/// Operator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Restore policy
    #[serde(default)]
    pub restore: RestoreSettings,

    /// Default log filter when `PRESS_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            restore: RestoreSettings::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &PressPaths) -> Result<Self, PressError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| PressError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PressError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PressPaths) -> Result<(), PressError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PressError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PressError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
