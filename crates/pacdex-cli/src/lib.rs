//! Package file-name resolver command.
//!
//! This crate wraps `pacdex-formats` in a small command: it reads compressed
//! repository databases from disk one after another, decompresses and indexes
//! each, and prints one `repository: package -> file_name` line per resolved
//! package.
//!
//! # Example
//!
//! ```no_run
//! use pacdex_cli::{ResolveConfig, run};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ResolveConfig::from_args();
//!     config.validate()?;
//!
//!     let summary = run(&config, &mut std::io::stdout().lock())?;
//!     println!(
//!         "{} resolved, {} failed, {} repositories unreadable",
//!         summary.resolved, summary.failed, summary.failed_repositories
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;

pub use config::{RepositorySource, ResolveConfig};
pub use error::ConfigError;

use anyhow::{Context, Result};
use pacdex_formats::{CompressedBlob, RepositoryDatabase};
use std::io::Write;
use tracing::{error, info};

/// Outcome counts of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Packages written to the output
    pub resolved: usize,
    /// Packages that could not be resolved
    pub failed: usize,
    /// Databases that could not be read or opened
    pub failed_repositories: usize,
}

impl RunSummary {
    /// Whether every database opened and every requested package resolved
    pub const fn is_success(&self) -> bool {
        self.failed == 0 && self.failed_repositories == 0
    }
}

/// Read, decompress and index one database
///
/// # Errors
///
/// Fails when no repository name or codec can be derived, the file cannot be
/// read, or the database cannot be decompressed and indexed.
pub fn open_repository(
    config: &ResolveConfig,
    source: &RepositorySource,
) -> Result<RepositoryDatabase> {
    let repository = source.repository_name().ok_or_else(|| {
        ConfigError::MissingRequired(format!(
            "repository name for {}",
            source.path.display()
        ))
    })?;
    let codec = config.resolved_codec(source)?;

    let bytes = std::fs::read(&source.path)
        .with_context(|| format!("Failed to read {}", source.path.display()))?;
    info!(
        repository = %repository,
        path = %source.path.display(),
        codec = %codec,
        bytes = bytes.len(),
        "loading repository database"
    );

    let blob = CompressedBlob::new(codec, bytes);
    RepositoryDatabase::open(repository, &blob, &config.decompress_options())
        .context("Failed to open repository database")
}

/// Resolve every requested package in every configured database
///
/// Databases are processed in the order given, each with its own buffer and
/// index, which is dropped before the next one is read. A database that fails
/// to open is logged and counted and the next one is still processed. The
/// same holds for a package that fails to resolve. Only an output write error
/// aborts the run.
///
/// # Errors
///
/// Returns an error only when writing to `out` fails.
pub fn run<W: Write>(config: &ResolveConfig, out: &mut W) -> Result<RunSummary> {
    let patterns = config.patterns();
    let mut summary = RunSummary::default();

    for source in config.sources() {
        let database = match open_repository(config, source) {
            Ok(database) => database,
            Err(e) => {
                error!(path = %source.path.display(), "{e:#}");
                summary.failed_repositories += 1;
                continue;
            }
        };

        for (pattern, result) in patterns
            .iter()
            .zip(database.resolve_all(&patterns, config.resolve_options()))
        {
            match result {
                Ok(resolved) => {
                    writeln!(out, "{resolved}").context("Failed to write output")?;
                    summary.resolved += 1;
                }
                Err(e) => {
                    error!(repository = %database.name(), package = %pattern, "{e}");
                    summary.failed += 1;
                }
            }
        }
    }

    Ok(summary)
}
