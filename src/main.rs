use anyhow::Result;
use clap::{Parser, Subcommand};

use press::cli::{handle_audit_command, handle_backup_command};
use press::config::{paths::PressPaths, settings::Settings};
use press::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "press",
    author = "Kaylee Beyene",
    version,
    about = "Snapshot restore for the Press publishing platform",
    long_about = "Press restores exported content snapshots into the live store. \
                  Rows keep their original IDs, collections are applied in \
                  foreign-key order, and the site is held in maintenance mode \
                  while a restore runs."
)]
struct Cli {
    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Backup management commands
    #[command(subcommand)]
    Backup(press::cli::BackupCommands),

    /// Show whether the site is in maintenance mode
    Maintenance,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init {
        /// Site name for the initial settings row
        #[arg(long, default_value = "Press")]
        site_name: String,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = PressPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(cli.quiet, cli.verbose, &settings.log_level)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&paths, &settings, &storage, cmd)?;
        }
        Some(Commands::Maintenance) => {
            if storage.maintenance_active()? {
                println!("Maintenance mode: on");
            } else {
                println!("Maintenance mode: off");
            }
        }
        Some(Commands::Audit { limit }) => {
            handle_audit_command(&paths, limit)?;
        }
        Some(Commands::Init { site_name }) => {
            println!("Initializing Press at: {}", paths.base_dir().display());
            let created = initialize_storage(&storage, &site_name)?;
            settings.save(&paths)?;
            if created {
                println!("Created site settings for '{}'.", site_name);
            } else {
                println!("Site settings already exist.");
            }
            println!("Initialization complete!");
        }
        Some(Commands::Config) => {
            println!("Press Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Schema version: {}", settings.schema_version);
            println!("  Log level: {}", settings.log_level);
            println!(
                "  Flag new users for reset: {}",
                settings.restore.flag_new_users_for_reset
            );
        }
        None => {
            println!("Press - snapshot restore");
            println!();
            println!("Run 'press --help' for usage information.");
        }
    }

    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool, default_level: &str) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        default_level
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("PRESS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
