//! Error types for the resolver command.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration value
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// `--database` value that is not `[NAME=]PATH`
    #[error("Invalid database source {0:?}, expected [NAME=]PATH")]
    InvalidSource(String),

    /// Codec neither given nor derivable from the file name
    #[error("Cannot infer compression codec from {0}, pass --codec gz or --codec xz")]
    UnknownCodec(PathBuf),
}
