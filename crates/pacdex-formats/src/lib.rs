//! Decoders and resolvers for compressed package-repository indices
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::doc_markdown)] // Repository-specific terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::missing_errors_doc)] // Error enums document themselves
//! Package repositories such as pacman or MSYS2 publish their metadata as a
//! compressed tar archive (`<repo>.db.tar.gz`, `<repo>.db.tar.xz`) holding one
//! `desc` file per package version. This crate turns that archive into the
//! canonical distributable file name of a package.
//!
//! # Pipeline
//!
//! ```text
//! CompressedBlob → decompress → raw tar → ArchiveIndex → Resolver → ResolvedPackage
//! ```
//!
//! - **Compression**: gzip/zlib and XZ containers behind one [`compression::decompress`]
//! - **Tar**: zero-copy index of entry names, offsets and sizes over one owned buffer
//! - **Descriptor**: `%FIELD%` block parser for package `desc` files
//! - **Resolver**: repository-aware name matching and `%FILENAME%` extraction
//! - **Database**: owning pair of raw buffer and index for one repository
//!
//! # Example
//!
//! ```rust
//! use pacdex_formats::compression::{Codec, CompressedBlob, DecompressOptions};
//! use pacdex_formats::database::RepositoryDatabase;
//! use pacdex_formats::resolver::PackagePattern;
//! use flate2::{Compression, write::GzEncoder};
//! use std::io::Write;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let desc = b"%FILENAME%\ncurl-8.5.0-1-x86_64.pkg.tar.zst\n";
//! let mut header = tar::Header::new_gnu();
//! header.set_size(desc.len() as u64);
//! header.set_mode(0o644);
//! let mut builder = tar::Builder::new(Vec::new());
//! builder.append_data(&mut header, "curl-8.5.0-1/desc", &desc[..])?;
//! let tar = builder.into_inner()?;
//!
//! let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
//! encoder.write_all(&tar)?;
//! let blob = CompressedBlob::new(Codec::Gzip, encoder.finish()?);
//!
//! let database = RepositoryDatabase::open("core", &blob, &DecompressOptions::default())?;
//! let resolved = database.resolve(&PackagePattern::literal("curl"))?;
//! assert_eq!(resolved.file_name, "curl-8.5.0-1-x86_64.pkg.tar.zst");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Gzip/zlib and XZ decompression of fetched repository indices
pub mod compression;
/// Owning repository database: raw tar buffer plus its entry index
pub mod database;
/// Package `desc` file parser and builder
pub mod descriptor;
/// Package-name matching and file-name resolution
pub mod resolver;
/// Zero-copy tar archive indexing, entry extraction and building
///
/// Entries are recorded as offset/size pairs into the caller's buffer, so
/// indexing never copies payload bytes. See [`crate::tar::ArchiveIndex`].
pub mod tar;

pub use compression::{Codec, CompressedBlob, DecompressError, DecompressOptions, decompress};
pub use database::{DatabaseError, RepositoryDatabase};
pub use descriptor::{DescriptorError, PackageDescriptor};
pub use resolver::{
    PackagePattern, ResolveError, ResolveOptions, ResolvedPackage, Resolver, TieBreak, resolve,
};
pub use self::tar::{ArchiveEntry, ArchiveError, ArchiveIndex, build_index, list_names, read_entry};

#[cfg(test)]
pub(crate) mod test_utils;
