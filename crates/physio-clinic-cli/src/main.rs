//! Physio Clinic CLI - Application entry point
//!
//! Opens the clinic store and dispatches one command against it.

mod args;
mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{Cli, Commands};
use config::CliConfig;
use physio_clinic_core::Clinic;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = CliConfig::from_env();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose, &config.log_filter);
    tracing::debug!(?config, "Configuration loaded");
    if let Some(e) = &config.policy_error {
        tracing::warn!("{}, using raw enrollment", e);
    }

    if let Err(e) = run(cli, config) {
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: CliConfig) -> anyhow::Result<()> {
    let db_path = cli.db.unwrap_or(config.db_path);
    let mut clinic = Clinic::open(&db_path)?.with_policy(config.admission_policy);

    match cli.command {
        Commands::Status => commands::status(&clinic),
        Commands::Waitlist { group } => commands::waitlist(&clinic, &group),
        Commands::Recalculate => commands::recalculate(&mut clinic),
        Commands::Export { path, no_bom } => commands::export(&clinic, path, !no_bom),
        Commands::Import { path } => commands::import(&mut clinic, &path),
        Commands::ExportCsv { table, path } => commands::export_csv(&clinic, &table, &path),
        Commands::ImportWorkbook { path } => commands::import_workbook(&mut clinic, &path),
        Commands::Settings { clinic_name } => commands::settings(&mut clinic, clinic_name),
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool, filter: &str) {
    let filter = if verbose { "debug" } else { filter };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
