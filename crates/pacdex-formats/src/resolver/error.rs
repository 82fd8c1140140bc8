//! Resolution error types

use crate::descriptor::DescriptorError;
use crate::tar::ArchiveError;
use thiserror::Error;

/// Errors raised while resolving one package name
///
/// Every variant names the repository or entry it concerns so the caller can
/// report it without further context.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No descriptor entry matched the package pattern
    #[error("no package matching '{pattern}' in repository '{repository}'")]
    PackageNotFound {
        /// Repository searched
        repository: String,
        /// Package pattern as requested
        pattern: String,
    },

    /// The matched descriptor has no usable `%FILENAME%`
    #[error("descriptor '{entry}' in repository '{repository}': {source}")]
    DescriptorFieldMissing {
        /// Repository searched
        repository: String,
        /// Matched descriptor entry
        entry: String,
        /// Which field was missing or empty
        #[source]
        source: DescriptorError,
    },

    /// A regular-expression pattern did not compile
    #[error("invalid package pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern as requested
        pattern: String,
        /// Compiler error
        #[source]
        source: regex::Error,
    },

    /// Reading the matched entry failed
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
}

impl ResolveError {
    /// Whether nothing in the archive matched
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PackageNotFound { .. })
    }
}

/// Result type for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;
