//! Resolver configuration management.
//!
//! Configuration comes from CLI arguments with `PACDEX_*` environment
//! variable fallbacks:
//!
//! - `--database` / `PACDEX_DATABASES`: compressed repository databases as
//!   `[NAME=]PATH`, repeated or comma-separated, processed in order. `NAME`
//!   defaults to the file name up to `.db` (`mingw64.db.tar.gz` → `mingw64`)
//! - `--package` / `PACDEX_PACKAGES`: package names, repeated or comma-separated
//! - `--codec` / `PACDEX_CODEC`: `gzip` or `xz` for every database, defaults
//!   to each file's suffix
//! - `--regex`: treat package names as regular-expression fragments
//! - `--tie-break` / `PACDEX_TIE_BREAK`: `first` or `greatest`
//! - `--max-decompressed-size` / `PACDEX_MAX_DECOMPRESSED_SIZE`: bytes, `0` for
//!   no limit
//!
//! # Example
//!
//! ```no_run
//! use pacdex_cli::ResolveConfig;
//!
//! let config = ResolveConfig::from_args();
//! config.validate().expect("Invalid configuration");
//! println!(
//!     "resolving {} packages in {} repositories",
//!     config.packages.len(),
//!     config.sources().count()
//! );
//! ```

use crate::error::ConfigError;
use clap::Parser;
use pacdex_formats::compression::MAX_DECOMPRESSION_SIZE;
use pacdex_formats::{Codec, DecompressOptions, PackagePattern, ResolveOptions, TieBreak};
use std::path::PathBuf;
use std::str::FromStr;

/// One repository database to open: an optional explicit name and a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySource {
    /// Explicit repository name from `NAME=PATH`
    pub name: Option<String>,
    /// Compressed database file
    pub path: PathBuf,
}

impl RepositorySource {
    /// Source whose name is derived from the file name
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            name: None,
            path: path.into(),
        }
    }

    /// Whether the value was blank, such as `a,,b`
    pub fn is_blank(&self) -> bool {
        self.name.is_none() && self.path.as_os_str().is_empty()
    }

    /// Repository name, explicit or taken from the database file name
    pub fn repository_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        let file_name = self.path.file_name()?.to_str()?;
        let stem = file_name
            .split_once(".db")
            .map_or(file_name, |(stem, _)| stem);
        (!stem.is_empty() && stem != file_name).then(|| stem.to_string())
    }

    /// Codec, the override or inferred from the file suffix
    pub fn codec(&self, codec: Option<Codec>) -> Result<Codec, ConfigError> {
        if let Some(codec) = codec {
            return Ok(codec);
        }
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(Codec::from_file_name)
            .ok_or_else(|| ConfigError::UnknownCodec(self.path.clone()))
    }
}

impl FromStr for RepositorySource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((name, path)) = s.split_once('=') else {
            return Ok(Self::from_path(s));
        };
        // `=` inside a directory component belongs to the path
        if name.contains(['/', '\\']) {
            return Ok(Self::from_path(s));
        }
        let (name, path) = (name.trim(), path.trim());
        if name.is_empty() || path.is_empty() {
            return Err(ConfigError::InvalidSource(s.to_string()));
        }
        Ok(Self {
            name: Some(name.to_string()),
            path: PathBuf::from(path),
        })
    }
}

/// Resolver configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pacdex",
    about = "Resolve package names to file names in compressed repository databases",
    version
)]
pub struct ResolveConfig {
    /// Compressed repository databases as `[NAME=]PATH` (e.g. `core.db.tar.gz`)
    #[arg(
        long = "database",
        short = 'd',
        env = "PACDEX_DATABASES",
        value_delimiter = ','
    )]
    pub databases: Vec<RepositorySource>,

    /// Package names to resolve
    #[arg(
        long = "package",
        short = 'p',
        env = "PACDEX_PACKAGES",
        value_delimiter = ','
    )]
    pub packages: Vec<String>,

    /// Compression codec for every database, inferred per file when omitted
    #[arg(long, env = "PACDEX_CODEC")]
    pub codec: Option<Codec>,

    /// Treat package names as regular-expression fragments
    #[arg(long)]
    pub regex: bool,

    /// Which descriptor wins when several match
    #[arg(long, env = "PACDEX_TIE_BREAK", default_value = "first")]
    pub tie_break: TieBreak,

    /// Ceiling on decompressed bytes per database, 0 disables it
    #[arg(
        long,
        env = "PACDEX_MAX_DECOMPRESSED_SIZE",
        default_value_t = MAX_DECOMPRESSION_SIZE
    )]
    pub max_decompressed_size: usize,
}

impl ResolveConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - No database was given
    /// - A database file doesn't exist
    /// - A repository name is neither given nor derivable
    /// - A codec is neither given nor derivable
    /// - No package was requested
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources().next().is_none() {
            return Err(ConfigError::MissingRequired(
                "at least one --database".to_string(),
            ));
        }

        for source in self.sources() {
            if !source.path.is_file() {
                return Err(ConfigError::MissingRequired(format!(
                    "database file not found: {}",
                    source.path.display()
                )));
            }

            if source.repository_name().is_none() {
                return Err(ConfigError::MissingRequired(format!(
                    "repository name for {} (pass NAME={})",
                    source.path.display(),
                    source.path.display()
                )));
            }

            self.resolved_codec(source)?;
        }

        if self.packages.iter().all(|name| name.trim().is_empty()) {
            return Err(ConfigError::MissingRequired(
                "at least one --package".to_string(),
            ));
        }

        Ok(())
    }

    /// Databases in the order given, blanks dropped
    pub fn sources(&self) -> impl Iterator<Item = &RepositorySource> {
        self.databases.iter().filter(|source| !source.is_blank())
    }

    /// Codec for one database
    pub fn resolved_codec(&self, source: &RepositorySource) -> Result<Codec, ConfigError> {
        source.codec(self.codec)
    }

    /// Decompression limits
    pub fn decompress_options(&self) -> DecompressOptions {
        match self.max_decompressed_size {
            0 => DecompressOptions::unlimited(),
            limit => DecompressOptions::with_limit(limit),
        }
    }

    /// Resolution options
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            tie_break: self.tie_break,
        }
    }

    /// Requested packages as patterns, blanks dropped
    pub fn patterns(&self) -> Vec<PackagePattern> {
        self.packages
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(|name| {
                if self.regex {
                    PackagePattern::regex(name)
                } else {
                    PackagePattern::literal(name)
                }
            })
            .collect()
    }
}
