//! pacdex binary entry point.
//!
//! This is a thin wrapper around the pacdex-cli library that:
//! 1. Initializes logging
//! 2. Parses and validates configuration
//! 3. Resolves the requested packages, printing one line each

use anyhow::Result;
use pacdex_cli::{ResolveConfig, run};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ResolveConfig::from_args();
    config.validate()?;

    let summary = run(&config, &mut std::io::stdout().lock())?;
    tracing::info!(
        resolved = summary.resolved,
        failed = summary.failed,
        failed_repositories = summary.failed_repositories,
        "resolution finished"
    );

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
