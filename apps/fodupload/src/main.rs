//! fodupload entry point.

mod adapter;
mod app;
mod bsi;
mod cli;
mod config;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse_args();

    match try_main(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Upload failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &cli::Cli) -> anyhow::Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting fodupload");

    let config = config::Config::load(cli.config.as_deref())?;

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(app::run(cli, config))?;

    println!(
        "Scan {} uploaded successfully. Total bytes sent: {}",
        report.scan_id, report.bytes_sent
    );
    Ok(())
}
