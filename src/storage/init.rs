//! Storage initialization
//!
//! Handles first-run setup: directories and the settings singleton.

use crate::error::PressError;
use crate::models::{SettingsId, SiteSettings};

use super::Storage;

/// Initialize storage for a fresh installation
///
/// Creates the settings row if none exists. Returns `true` when a row was
/// created.
pub fn initialize_storage(storage: &Storage, site_name: &str) -> Result<bool, PressError> {
    storage.paths().ensure_directories()?;

    if storage.settings.count()? > 0 {
        return Ok(false);
    }

    storage.upsert_settings(SiteSettings::new(SettingsId::new(1), site_name))?;
    tracing::info!(site_name, "created settings row");
    Ok(true)
}
