//! Audit CLI command
//!
//! Shows recent entries from the append-only audit log.

use crate::audit::AuditLogger;
use crate::config::paths::PressPaths;
use crate::error::PressResult;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(paths: &PressPaths, limit: usize) -> PressResult<()> {
    let logger = AuditLogger::new(paths.audit_log());
    let entries = logger.read_recent(limit)?;

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    let total = logger.entry_count()?;
    if total > entries.len() {
        println!();
        println!("Showing {} of {} entries", entries.len(), total);
    }

    Ok(())
}
