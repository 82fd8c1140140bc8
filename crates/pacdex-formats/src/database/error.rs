//! Repository database error types

use crate::compression::DecompressError;
use crate::tar::ArchiveError;
use thiserror::Error;

/// Result type for opening a repository database
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors raised while opening a repository database
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The compressed index could not be decoded
    #[error("repository '{repository}': {source}")]
    Decompress {
        /// Repository being opened
        repository: String,
        /// Decoder failure
        #[source]
        source: DecompressError,
    },

    /// The decompressed bytes are not a well-formed tar stream
    #[error("repository '{repository}': {source}")]
    Archive {
        /// Repository being opened
        repository: String,
        /// Indexing failure
        #[source]
        source: ArchiveError,
    },
}

impl DatabaseError {
    /// Repository the error concerns
    pub fn repository(&self) -> &str {
        match self {
            Self::Decompress { repository, .. } | Self::Archive { repository, .. } => repository,
        }
    }

    /// Whether the fetched bytes are damaged rather than over a limit
    pub fn is_corrupt(&self) -> bool {
        match self {
            Self::Decompress { source, .. } => source.is_corrupt_input(),
            Self::Archive { source, .. } => source.is_corrupt(),
        }
    }
}
