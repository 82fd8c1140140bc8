//! Decompression error types

use super::Codec;
use thiserror::Error;

/// Error raised while decoding a compressed repository index
///
/// No variant carries partial output: after any of these the caller holds no
/// usable bytes.
#[derive(Debug, Error)]
pub enum DecompressError {
    /// Zero-length input has no container header to decode
    #[error("empty {codec} input: no container header")]
    EmptyInput {
        /// Codec the caller asked for
        codec: Codec,
    },

    /// Decoder could not be set up
    #[error("{codec} decoder initialization failed: {reason}")]
    Init {
        /// Codec being initialized
        codec: Codec,
        /// Decoder-reported cause
        reason: String,
    },

    /// Bad header, bad checksum or invalid compressed data
    #[error("corrupt {codec} stream: {reason}")]
    Corrupt {
        /// Codec of the stream
        codec: Codec,
        /// Decoder-reported cause
        reason: String,
    },

    /// Input ran out before the end-of-stream marker
    #[error("truncated {codec} stream: input ended after {consumed} bytes without end-of-stream marker")]
    Truncated {
        /// Codec of the stream
        codec: Codec,
        /// Compressed bytes consumed before the decoder stalled
        consumed: u64,
    },

    /// Output grew past the configured ceiling
    #[error("decompressed {codec} output exceeds limit of {limit} bytes")]
    SizeLimitExceeded {
        /// Codec of the stream
        codec: Codec,
        /// Configured ceiling in bytes
        limit: usize,
    },
}

impl DecompressError {
    /// Codec that failed
    pub fn codec(&self) -> Codec {
        match self {
            Self::EmptyInput { codec }
            | Self::Init { codec, .. }
            | Self::Corrupt { codec, .. }
            | Self::Truncated { codec, .. }
            | Self::SizeLimitExceeded { codec, .. } => *codec,
        }
    }

    /// Whether the input itself is damaged (as opposed to a limit being hit)
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput { .. } | Self::Corrupt { .. } | Self::Truncated { .. }
        )
    }
}

/// Result type for decompression
pub type DecompressResult<T> = Result<T, DecompressError>;
