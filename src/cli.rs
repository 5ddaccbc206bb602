use artcare_common::{PhotoRole, StorageMode, WorkId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "artcare")]
#[command(author, version, about = "Photo storage and backup tool for the art-teaching record book")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcode and store a photo using the current storage mode
    Upload {
        /// Image file to store
        #[arg(required = true)]
        file: PathBuf,

        /// Photo role: `work` or `field`
        #[arg(long, default_value = "work")]
        role: PhotoRole,

        /// Attach the stored photo as this work's image
        #[arg(long)]
        work: Option<WorkId>,
    },

    /// Show estimated storage usage
    Usage {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a backup of the whole dataset
    Export {
        /// Output file (default: artcare-backup-<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the whole dataset with a backup
    Restore {
        /// Backup file to restore
        #[arg(required = true)]
        file: PathBuf,

        /// Confirm that all current data will be deleted
        #[arg(long)]
        yes: bool,
    },

    /// Show or set the storage mode used for new photos
    Mode {
        /// New mode: `embedded` or `external`
        mode: Option<StorageMode>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
