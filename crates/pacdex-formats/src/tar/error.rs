//! Error types for tar indexing and extraction

use thiserror::Error;

/// Tar operation result type
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors raised while indexing or reading a tar archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A header record could not be read or decoded
    ///
    /// Covers partial records, bad checksums and unparsable numeric fields.
    #[error("malformed tar archive at or after offset {offset}: {source}")]
    Malformed {
        /// End of the last entry indexed before the failure
        offset: u64,
        /// Reader error
        #[source]
        source: std::io::Error,
    },

    /// Entry payload reaches past the end of the buffer
    #[error(
        "payload of '{name}' ({size} bytes at offset {offset}) exceeds archive length {archive_len}"
    )]
    PayloadOutOfBounds {
        /// Entry name
        name: String,
        /// Payload start
        offset: u64,
        /// Payload length
        size: u64,
        /// Length of the raw buffer
        archive_len: usize,
    },

    /// Exact-name lookup found nothing
    #[error("entry not found in archive: {0}")]
    EntryNotFound(String),
}

impl ArchiveError {
    /// Whether the archive bytes are malformed
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::Malformed { .. } | Self::PayloadOutOfBounds { .. }
        )
    }

    /// Whether this is an exact-name lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EntryNotFound(_))
    }
}
