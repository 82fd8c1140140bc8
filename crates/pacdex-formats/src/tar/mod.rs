//! Tar archive indexing and extraction
//!
//! Repository databases are plain tar streams once decompressed. This module
//! walks the 512-byte header records once and records, for every entry, its
//! name together with the offset and size of its payload in the raw buffer.
//! Payloads are only touched when an entry is read.
//!
//! Header records are decoded with the `tar` crate, so ustar prefixes, GNU
//! long names, pax path overrides, base-256 sizes and header checksums are
//! handled the way common tar writers produce them. pax global headers are
//! consumed and never indexed.
//!
//! # Example
//!
//! ```rust
//! use pacdex_formats::tar::ArchiveIndex;
//!
//! let desc = b"%FILENAME%\nzstd-1.5.5-1-x86_64.pkg.tar.zst\n";
//! let mut header = tar::Header::new_gnu();
//! header.set_size(desc.len() as u64);
//! header.set_mode(0o644);
//! let mut builder = tar::Builder::new(Vec::new());
//! builder.append_data(&mut header, "zstd-1.5.5-1/desc", &desc[..])?;
//! let data = builder.into_inner()?;
//!
//! let index = ArchiveIndex::build(&data)?;
//! assert_eq!(index.names().collect::<Vec<_>>(), ["zstd-1.5.5-1/desc"]);
//! let payload = index.read_entry(&data, "zstd-1.5.5-1/desc")?;
//! assert!(payload.starts_with(b"%FILENAME%"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod index;

pub use error::{ArchiveError, ArchiveResult};
pub use index::{ArchiveEntry, ArchiveIndex, EntryKind, Names};

/// Size of a tar record
pub const BLOCK_SIZE: usize = 512;

/// Payload length rounded up to whole records
pub(crate) fn padded_len(size: usize) -> usize {
    size.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Index a raw tar buffer, see [`ArchiveIndex::build`]
pub fn build_index(data: &[u8]) -> ArchiveResult<ArchiveIndex> {
    ArchiveIndex::build(data)
}

/// Payload of the entry named `name`, see [`ArchiveIndex::read_entry`]
pub fn read_entry<'a>(data: &'a [u8], index: &ArchiveIndex, name: &str) -> ArchiveResult<&'a [u8]> {
    index.read_entry(data, name)
}

/// Entry names of an index in archive order
pub fn list_names(index: &ArchiveIndex) -> Names<'_> {
    index.names()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(1), 512);
        assert_eq!(padded_len(512), 512);
        assert_eq!(padded_len(513), 1024);
    }
}
