//! Container decompression for repository indices
//!
//! Repository databases are published as gzip (`.db.tar.gz`) or XZ
//! (`.db.tar.xz`) containers. The codec is never sniffed between the two: the
//! caller knows it from the file-name suffix and tags the bytes with it in a
//! [`CompressedBlob`]. Within the gzip codec, zlib and gzip headers are both
//! accepted and told apart by the gzip magic.
//!
//! Decompression is all-or-nothing. A stream that does not reach its
//! end-of-stream marker is an error and no partial output is returned.

mod error;
mod gzip;
mod xz;

pub use error::{DecompressError, DecompressResult};

use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Default ceiling on decompressed output (1 GB)
///
/// Repository databases are a few megabytes uncompressed; anything near this
/// size is a compression bomb or a corrupt stream.
pub const MAX_DECOMPRESSION_SIZE: usize = 1024 * 1024 * 1024;

/// Output window drained from the inflate stream per step (1 MiB)
pub const GZIP_WINDOW_SIZE: usize = 1 << 20;

/// Input and output step for the XZ decoder (64 KiB)
pub const XZ_CHUNK_SIZE: usize = 64 * 1024;

/// Container codec of a fetched repository index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Deflate stream with gzip or zlib framing
    Gzip,
    /// XZ container (LZMA2)
    Xz,
}

impl Codec {
    /// Pick the codec from a file-name suffix such as `core.db.tar.gz`
    ///
    /// Returns `None` when the suffix names neither codec.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".gz") || lower.ends_with(".tgz") {
            Some(Self::Gzip)
        } else if lower.ends_with(".xz") || lower.ends_with(".txz") {
            Some(Self::Xz)
        } else {
            None
        }
    }

    /// Lowercase codec name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Xz => "xz",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Codec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gzip" | "gz" | "zlib" => Ok(Self::Gzip),
            "xz" => Ok(Self::Xz),
            other => Err(format!("unknown codec '{other}', expected gzip or xz")),
        }
    }
}

/// Compressed repository index bytes tagged with their codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedBlob {
    codec: Codec,
    data: Vec<u8>,
}

impl CompressedBlob {
    /// Wrap fetched bytes
    pub fn new(codec: Codec, data: Vec<u8>) -> Self {
        Self { codec, data }
    }

    /// Codec the bytes are encoded with
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Compressed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Compressed length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the blob holds no bytes at all
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Decompress with the given options
    pub fn decompress(&self, options: &DecompressOptions) -> DecompressResult<Vec<u8>> {
        decompress_with(self, options)
    }
}

/// Decompression limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressOptions {
    /// Largest accepted output in bytes; `None` disables the ceiling
    pub max_output_size: Option<usize>,
}

impl Default for DecompressOptions {
    fn default() -> Self {
        Self {
            max_output_size: Some(MAX_DECOMPRESSION_SIZE),
        }
    }
}

impl DecompressOptions {
    /// Options with a custom output ceiling
    pub fn with_limit(max_output_size: usize) -> Self {
        Self {
            max_output_size: Some(max_output_size),
        }
    }

    /// Options without any output ceiling
    pub fn unlimited() -> Self {
        Self {
            max_output_size: None,
        }
    }
}

/// Decompress a blob with the default 1 GB ceiling
pub fn decompress(blob: &CompressedBlob) -> DecompressResult<Vec<u8>> {
    decompress_with(blob, &DecompressOptions::default())
}

/// Decompress a blob with explicit limits
pub fn decompress_with(
    blob: &CompressedBlob,
    options: &DecompressOptions,
) -> DecompressResult<Vec<u8>> {
    let codec = blob.codec();
    if blob.is_empty() {
        return Err(DecompressError::EmptyInput { codec });
    }

    let mut sink = OutputSink::new(codec, options.max_output_size);
    match codec {
        Codec::Gzip => gzip::inflate(blob.as_bytes(), &mut sink)?,
        Codec::Xz => xz::unpack(blob.as_bytes(), &mut sink)?,
    }

    let raw = sink.into_inner();
    debug!(
        codec = %codec,
        compressed = blob.len(),
        decompressed = raw.len(),
        "decompressed repository index"
    );
    Ok(raw)
}

/// Growing output buffer that enforces the size ceiling
pub(crate) struct OutputSink {
    codec: Codec,
    limit: Option<usize>,
    buffer: Vec<u8>,
}

impl OutputSink {
    fn new(codec: Codec, limit: Option<usize>) -> Self {
        Self {
            codec,
            limit,
            buffer: Vec::new(),
        }
    }

    /// Append decoded bytes, failing once the ceiling would be crossed
    fn extend(&mut self, chunk: &[u8]) -> DecompressResult<()> {
        if let Some(limit) = self.limit
            && self.buffer.len() + chunk.len() > limit
        {
            return Err(DecompressError::SizeLimitExceeded {
                codec: self.codec,
                limit,
            });
        }
        self.buffer.extend_from_slice(chunk);
        Ok(())
    }

    fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}
