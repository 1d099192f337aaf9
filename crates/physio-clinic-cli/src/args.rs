//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Front desk tools for the physio clinic store
#[derive(Parser, Debug)]
#[command(name = "physio-clinic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Store file path
    #[arg(short, long, global = true, env = "CLINIC_DB_PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every group's capacity, enrollment and waitlist
    Status,

    /// List a group's waitlist in promotion order
    Waitlist {
        /// Group id or name
        group: String,
    },

    /// Recompute every group's available counter
    Recalculate,

    /// Write a backup file (defaults to the last export location)
    Export {
        path: Option<PathBuf>,

        /// Omit the UTF-8 byte order mark
        #[arg(long)]
        no_bom: bool,
    },

    /// Replace all data with a backup file
    Import { path: PathBuf },

    /// Export one table as CSV
    ExportCsv {
        /// `patients` or `payments`
        table: String,
        path: PathBuf,
    },

    /// Import a roster workbook converted to JSON
    ImportWorkbook { path: PathBuf },

    /// Show or change clinic settings
    Settings {
        #[arg(long)]
        clinic_name: Option<String>,
    },
}
