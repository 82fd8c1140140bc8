//! Repository database
//!
//! A [`RepositoryDatabase`] owns the decompressed tar buffer of one repository
//! together with the index built over it. Entry payloads and resolution
//! results borrow from the database, so it must outlive them.

mod error;

pub use error::{DatabaseError, DatabaseResult};

use crate::compression::{CompressedBlob, DecompressOptions};
use crate::descriptor::PackageDescriptor;
use crate::resolver::{PackagePattern, ResolveOptions, ResolveResult, ResolvedPackage, Resolver};
use crate::tar::{ArchiveEntry, ArchiveIndex, ArchiveResult, Names};
use tracing::info;

/// Decompressed and indexed repository database
#[derive(Debug, Clone)]
pub struct RepositoryDatabase {
    name: String,
    data: Vec<u8>,
    index: ArchiveIndex,
}

impl RepositoryDatabase {
    /// Decompress and index a fetched repository database
    pub fn open(
        name: impl Into<String>,
        blob: &CompressedBlob,
        options: &DecompressOptions,
    ) -> DatabaseResult<Self> {
        let name = name.into();
        let data = blob
            .decompress(options)
            .map_err(|source| DatabaseError::Decompress {
                repository: name.clone(),
                source,
            })?;
        Self::from_raw(name, data)
    }

    /// Index an already decompressed tar buffer
    pub fn from_raw(name: impl Into<String>, data: Vec<u8>) -> DatabaseResult<Self> {
        let name = name.into();
        let index = ArchiveIndex::build(&data).map_err(|source| DatabaseError::Archive {
            repository: name.clone(),
            source,
        })?;

        info!(
            repository = %name,
            bytes = data.len(),
            entries = index.len(),
            "opened repository database"
        );

        Ok(Self { name, data, index })
    }

    /// Repository name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decompressed tar bytes
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    /// Entry index over [`Self::raw`]
    pub fn index(&self) -> &ArchiveIndex {
        &self.index
    }

    /// Indexed entries in archive order
    pub fn entries(&self) -> &[ArchiveEntry] {
        self.index.entries()
    }

    /// Entry names in archive order
    pub fn names(&self) -> Names<'_> {
        self.index.names()
    }

    /// Payload of the entry named `name`
    pub fn read_entry(&self, name: &str) -> ArchiveResult<&[u8]> {
        self.index.read_entry(&self.data, name)
    }

    /// Parsed descriptor stored under `entry_name`
    pub fn descriptor(&self, entry_name: &str) -> ArchiveResult<PackageDescriptor> {
        self.read_entry(entry_name).map(PackageDescriptor::from_bytes)
    }

    /// Resolver with default options
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.index, &self.data, &self.name)
    }

    /// Resolve one package pattern with default options
    pub fn resolve(&self, pattern: &PackagePattern) -> ResolveResult<ResolvedPackage> {
        self.resolver().resolve(pattern)
    }

    /// Resolve several patterns, one result per pattern
    pub fn resolve_all(
        &self,
        patterns: &[PackagePattern],
        options: ResolveOptions,
    ) -> Vec<ResolveResult<ResolvedPackage>> {
        self.resolver().with_options(options).resolve_all(patterns)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::compression::{Codec, DecompressError};
    use crate::tar::ArchiveError;
    use crate::test_utils::tar_archive;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn sample_tar() -> Vec<u8> {
        tar_archive(&[
            ("pacman-6.0.2-9/", b""),
            (
                "pacman-6.0.2-9/desc",
                b"%FILENAME%\npacman-6.0.2-9-x86_64.pkg.tar.zst\n\n%NAME%\npacman\n\n%VERSION%\n6.0.2-9\n",
            ),
        ])
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_open_gzip() {
        let blob = CompressedBlob::new(Codec::Gzip, gzip(&sample_tar()));
        let database =
            RepositoryDatabase::open("core", &blob, &DecompressOptions::default()).unwrap();

        assert_eq!(database.name(), "core");
        assert_eq!(database.raw(), sample_tar().as_slice());
        assert_eq!(
            database.names().collect::<Vec<_>>(),
            ["pacman-6.0.2-9/", "pacman-6.0.2-9/desc"]
        );

        let descriptor = database.descriptor("pacman-6.0.2-9/desc").unwrap();
        assert_eq!(descriptor.name(), Some("pacman"));
        assert_eq!(descriptor.version(), Some("6.0.2-9"));

        let resolved = database.resolve(&"pacman".into()).unwrap();
        assert_eq!(resolved.file_name, "pacman-6.0.2-9-x86_64.pkg.tar.zst");
    }

    #[test]
    fn test_open_reports_repository_on_decompress_failure() {
        let blob = CompressedBlob::new(Codec::Gzip, b"definitely not gzip".to_vec());
        let err = RepositoryDatabase::open("extra", &blob, &DecompressOptions::default())
            .unwrap_err();
        assert_eq!(err.repository(), "extra");
        assert!(err.is_corrupt());
        assert!(matches!(
            err,
            DatabaseError::Decompress {
                source: DecompressError::Corrupt { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_open_respects_size_limit() {
        let blob = CompressedBlob::new(Codec::Gzip, gzip(&sample_tar()));
        let err = RepositoryDatabase::open("core", &blob, &DecompressOptions::with_limit(1024))
            .unwrap_err();
        assert!(!err.is_corrupt());
        assert!(matches!(
            err,
            DatabaseError::Decompress {
                source: DecompressError::SizeLimitExceeded { limit: 1024, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_from_raw_rejects_truncated_tar() {
        let mut data = sample_tar();
        data.truncate(600);
        let err = RepositoryDatabase::from_raw("core", data).unwrap_err();
        assert!(err.is_corrupt());
        assert!(matches!(
            err,
            DatabaseError::Archive {
                source: ArchiveError::Malformed { offset: 512, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_all_with_options() {
        let database = RepositoryDatabase::from_raw("core", sample_tar()).unwrap();
        let patterns = vec![PackagePattern::literal("pacman"), PackagePattern::literal("yay")];
        let results = database.resolve_all(&patterns, ResolveOptions::default());
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().unwrap_err().is_not_found());
    }
}
