//! Zero-copy tar entry index

use super::error::{ArchiveError, ArchiveResult};
use super::padded_len;
use ::tar::{Archive, EntryType};
use std::ops::Range;
use tracing::{debug, trace};

/// Kind of an indexed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Hard or symbolic link
    Link,
    /// Any other type flag (devices, fifos, vendor extensions)
    Other(u8),
}

impl EntryKind {
    /// Map a header entry type
    pub fn from_entry_type(entry_type: EntryType) -> Self {
        if entry_type.is_file() {
            Self::File
        } else if entry_type.is_dir() {
            Self::Directory
        } else if entry_type.is_hard_link() || entry_type.is_symlink() {
            Self::Link
        } else {
            Self::Other(entry_type.as_byte())
        }
    }
}

/// One tar entry: its name and where its payload sits in the raw buffer
///
/// Entries never own payload bytes; `offset..offset + size` is a range into
/// the buffer the index was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveEntry {
    /// Full entry path
    pub name: String,
    /// Payload start in the raw buffer
    pub offset: usize,
    /// Payload length in bytes
    pub size: usize,
    /// Entry type
    pub kind: EntryKind,
}

impl ArchiveEntry {
    /// Payload byte range
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size
    }
}

/// Ordered entry list of one tar archive, in stream order
///
/// The index holds no reference to the buffer it was built from; every read
/// takes the buffer again and bounds-checks against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveIndex {
    entries: Vec<ArchiveEntry>,
}

impl ArchiveIndex {
    /// Index every entry of a raw tar buffer
    ///
    /// Header records are decoded by the `tar` crate, which folds GNU
    /// long-name and pax records into the entry they describe. Walking stops
    /// at the first all-zero record or at the end of the buffer. A partial
    /// header, an unparsable field, a bad checksum or a payload running past
    /// the buffer fails the whole build.
    pub fn build(data: &[u8]) -> ArchiveResult<Self> {
        let mut archive = Archive::new(data);
        let mut entries = Vec::new();
        // End of the last indexed payload, rounded to whole records
        let mut next_header = 0u64;

        let walker = archive
            .entries()
            .map_err(|source| ArchiveError::Malformed {
                offset: next_header,
                source,
            })?;

        for entry in walker {
            let entry = entry.map_err(|source| ArchiveError::Malformed {
                offset: next_header,
                source,
            })?;
            let entry_type = entry.header().entry_type();
            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let range = payload_range(data, &name, entry.raw_file_position(), entry.size())?;
            next_header = (range.start + padded_len(range.len())) as u64;

            if entry_type.is_pax_global_extensions() {
                continue;
            }

            trace!(name = %name, offset = range.start, size = range.len(), "indexed entry");
            entries.push(ArchiveEntry {
                name,
                offset: range.start,
                size: range.len(),
                kind: EntryKind::from_entry_type(entry_type),
            });
        }

        debug!(entries = entries.len(), bytes = data.len(), "indexed tar archive");
        Ok(Self { entries })
    }

    /// All entries in archive order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive held no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in archive order
    ///
    /// The iterator borrows the index, so calling this again restarts the
    /// sequence from the first entry.
    pub fn names(&self) -> Names<'_> {
        Names {
            inner: self.entries.iter(),
        }
    }

    /// First entry with exactly this name
    pub fn find(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Payload of the entry named `name`
    pub fn read_entry<'a>(&self, data: &'a [u8], name: &str) -> ArchiveResult<&'a [u8]> {
        let entry = self
            .find(name)
            .ok_or_else(|| ArchiveError::EntryNotFound(name.to_string()))?;
        Self::entry_data(data, entry)
    }

    /// Payload of an entry, checked against the buffer
    pub fn entry_data<'a>(data: &'a [u8], entry: &ArchiveEntry) -> ArchiveResult<&'a [u8]> {
        data.get(entry.range())
            .ok_or_else(|| ArchiveError::PayloadOutOfBounds {
                name: entry.name.clone(),
                offset: entry.offset as u64,
                size: entry.size as u64,
                archive_len: data.len(),
            })
    }
}

/// Payload range of one entry, checked against the buffer
fn payload_range(data: &[u8], name: &str, offset: u64, size: u64) -> ArchiveResult<Range<usize>> {
    let out_of_bounds = || ArchiveError::PayloadOutOfBounds {
        name: name.to_string(),
        offset,
        size,
        archive_len: data.len(),
    };

    let end = offset.checked_add(size).ok_or_else(out_of_bounds)?;
    let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
    let end = usize::try_from(end).map_err(|_| out_of_bounds())?;
    if end > data.len() {
        return Err(out_of_bounds());
    }
    Ok(start..end)
}

impl<'a> IntoIterator for &'a ArchiveIndex {
    type Item = &'a ArchiveEntry;
    type IntoIter = std::slice::Iter<'a, ArchiveEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Iterator over entry names, see [`ArchiveIndex::names`]
#[derive(Debug, Clone)]
pub struct Names<'a> {
    inner: std::slice::Iter<'a, ArchiveEntry>,
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| entry.name.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Names<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|entry| entry.name.as_str())
    }
}

impl ExactSizeIterator for Names<'_> {}

impl std::iter::FusedIterator for Names<'_> {}
