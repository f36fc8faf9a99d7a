//! Configuration module for Press
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Operator settings persistence

pub mod paths;
pub mod settings;

pub use paths::PressPaths;
pub use settings::Settings;
