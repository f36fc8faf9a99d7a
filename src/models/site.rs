//! Site-level configuration rows: settings singleton, ads and redirects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AdId, RedirectId, SettingsId};

/// Site-wide settings. The live store holds at most one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Unique identifier
    pub id: SettingsId,

    pub site_name: String,

    pub site_description: Option<String>,

    pub site_url: Option<String>,

    pub logo_url: Option<String>,

    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: i32,

    /// Advisory flag consulted by public request handling
    #[serde(default)]
    pub maintenance_mode: bool,

    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,
}

pub(crate) fn default_posts_per_page() -> i32 {
    10
}

impl SiteSettings {
    /// Create a settings row with defaults
    pub fn new(id: SettingsId, site_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            site_name: site_name.into(),
            site_description: None,
            site_url: None,
            logo_url: None,
            posts_per_page: default_posts_per_page(),
            maintenance_mode: false,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// An ad placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    /// Unique identifier
    pub id: AdId,

    pub name: String,

    /// Slot the ad renders into (e.g. "sidebar", "in-article")
    pub placement: String,

    /// Markup or script snippet
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub active: bool,

    pub starts_at: Option<DateTime<Utc>>,

    pub ends_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Ad {
    /// Whether the ad should render at the given instant
    pub fn is_live_at(&self, at: DateTime<Utc>) -> bool {
        self.active
            && self.starts_at.map_or(true, |s| s <= at)
            && self.ends_at.map_or(true, |e| at < e)
    }
}

/// A URL redirect rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redirect {
    /// Unique identifier
    pub id: RedirectId,

    /// Source path (unique)
    pub source: String,

    pub destination: String,

    #[serde(default = "default_status_code")]
    pub status_code: u16,

    #[serde(default)]
    pub active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Redirect {
    /// Create an active permanent redirect
    pub fn new(id: RedirectId, source: impl Into<String>, destination: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            source: source.into(),
            destination: destination.into(),
            status_code: default_status_code(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

pub(crate) fn default_status_code() -> u16 {
    301
}
