//! Backup CLI commands
//!
//! Implements CLI commands for importing, inspecting and restoring backups.

use clap::Subcommand;
use std::path::PathBuf;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::backup::{parse_envelope, RestoreEngine, RestoreOptions, SnapshotData, SnapshotReader};
use crate::config::paths::PressPaths;
use crate::config::settings::Settings;
use crate::error::{PressError, PressResult};
use crate::models::{BackupId, BackupRecord, BackupStatus, EntityKind, UserId};
use crate::storage::{BackupRepository, Storage};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Register an exported snapshot file as a completed backup
    Import {
        /// Path to the export file
        file: PathBuf,
    },

    /// List all stored backups
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show information about a specific backup
    Info {
        /// Backup ID (e.g. 42 or bkp-42)
        backup: BackupId,
    },

    /// Restore a backup into the live store
    Restore {
        /// Backup ID (e.g. 42 or bkp-42)
        backup: BackupId,

        /// User performing the restore, recorded in the audit log
        #[arg(short, long)]
        actor: UserId,

        /// Skip confirmation and write
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &PressPaths,
    settings: &Settings,
    storage: &Storage,
    cmd: BackupCommands,
) -> PressResult<()> {
    let backups = BackupRepository::open(paths.backups_file())?;
    let audit = AuditLogger::new(paths.audit_log());

    match cmd {
        BackupCommands::Import { file } => {
            let content = std::fs::read_to_string(&file).map_err(|e| {
                PressError::Io(format!("Failed to read {}: {}", file.display(), e))
            })?;

            // Reject unreadable exports before storing them
            let envelope = parse_envelope(BackupId::new(0), &content).map_err(|e| match e {
                PressError::MalformedSnapshot { reason, .. } => PressError::Json(format!(
                    "{} is not a snapshot export: {}",
                    file.display(),
                    reason
                )),
                other => other,
            })?;

            let mut record = BackupRecord::completed(BackupId::new(0), content);
            record.filename = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            let id = backups.register(record.clone())?;
            record.id = id;

            audit.log(&AuditEntry::create(
                EntityType::Backup,
                id.get().to_string(),
                record.filename.clone(),
                &serde_json::json!({
                    "filename": record.filename,
                    "size_bytes": record.size_bytes(),
                    "contents": envelope.data.contents(),
                }),
            )?)?;

            println!("Imported backup {}", id);
            println!("Size: {}", format_size(record.size_bytes()));
            print_contents(&envelope.data);
        }

        BackupCommands::List { verbose } => {
            let records = backups.list()?;

            if records.is_empty() {
                println!("No backups found.");
                println!("Import one with: press backup import <file>");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for record in &records {
                let age = chrono::Utc::now().signed_duration_since(record.created_at);
                let name = record.filename.as_deref().unwrap_or("-");

                if verbose {
                    println!(
                        "{} [{}]\n   File: {}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        record.id,
                        record.status,
                        name,
                        record.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(record.size_bytes()),
                        format_duration(age),
                    );
                } else {
                    println!(
                        "  {} [{}] {} ({} ago, {})",
                        record.id,
                        record.status,
                        name,
                        format_duration(age),
                        format_size(record.size_bytes()),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", records.len());
        }

        BackupCommands::Info { backup } => {
            let record = backups
                .get(backup)?
                .ok_or_else(|| PressError::backup_not_found(backup.get().to_string()))?;

            println!("Backup Details");
            println!("==============");
            println!("ID: {}", record.id);
            println!("Status: {}", record.status);
            if let Some(name) = &record.filename {
                println!("File: {}", name);
            }
            println!("Size: {}", format_size(record.size_bytes()));
            println!(
                "Created: {}",
                record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            if let Some(completed) = record.completed_at {
                println!("Completed: {}", completed.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            println!();

            match record.content.as_deref() {
                None => println!("Contents: none"),
                Some(content) => match parse_envelope(record.id, content) {
                    Ok(envelope) => {
                        if let Some(at) = envelope.exported_at {
                            println!("Exported: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
                        }
                        if let Some(kind) = &envelope.export_type {
                            println!("Export type: {}", kind);
                        }
                        print_contents(&envelope.data);
                    }
                    Err(e) => println!("Contents: unreadable ({})", e),
                },
            }

            println!();
            println!(
                "Restorable: {}",
                if record.status == BackupStatus::Completed && record.content.is_some() {
                    "Yes"
                } else {
                    "No"
                }
            );
        }

        BackupCommands::Restore {
            backup,
            actor,
            force,
        } => {
            // Validates status and content without touching the store
            let snapshot = SnapshotReader::new(&backups).read(backup)?;

            println!("Backup Information");
            println!("==================");
            println!("ID: {}", snapshot.backup_id);
            if let Some(at) = snapshot.exported_at {
                println!("Exported: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            print_contents(&snapshot.data);
            println!();

            if !force {
                println!("WARNING: This will overwrite live rows with the same IDs!");
                println!("The site is put into maintenance mode while restoring.");
                println!("To proceed, run again with --force flag:");
                println!(
                    "  press backup restore {} --actor {} --force",
                    backup.get(),
                    actor.get()
                );
                return Ok(());
            }

            println!("Restoring from backup...");
            let mut engine = RestoreEngine::new(storage, &backups, &audit)
                .with_options(RestoreOptions::from(&settings.restore));
            let stats = engine.restore(backup, actor)?;

            println!("Restore complete!");
            println!("{}", stats.summary());
            println!();
            for kind in EntityKind::all() {
                let count = stats.get(*kind);
                if count > 0 {
                    println!("  {:<14} {}", kind.type_name(), count);
                }
            }
        }
    }

    Ok(())
}

fn print_contents(data: &SnapshotData) {
    if data.is_empty() {
        println!("Contents: empty");
        return;
    }

    println!("Contents:");
    for (name, count) in data.contents() {
        println!("  {:<12} {}", name, count);
    }
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a payload size in human-readable form
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
