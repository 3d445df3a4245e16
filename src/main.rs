//! cv-harness - Main Entry Point
//!
//! Runs one cross-validated regression experiment and prints its report.
//! Logs and errors go to stderr; stdout carries only the report.

use clap::Parser;
use cv_harness::cli::{cmd_run, Cli};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cv_harness=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout().lock();
    cmd_run(&cli, stdout)?;

    Ok(())
}
