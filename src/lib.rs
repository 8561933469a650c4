pub mod biomarkers;
pub mod cli;
pub mod config;
pub mod engine;
pub mod labs;
pub mod models;
pub mod risk;
pub mod units;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<(), cli::CliError> {
    // Initialize tracing; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    cli::execute(&args)
}
