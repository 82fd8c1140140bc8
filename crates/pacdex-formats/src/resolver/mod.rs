//! Package-name resolution against an indexed repository database
//!
//! Resolution maps a short package name to the file name recorded in its
//! descriptor:
//!
//! 1. Build an [`EntryMatcher`] for `<prefix><pattern><anything>/desc`, where
//!    the prefix is repository-specific (see [`repository_prefix`])
//! 2. Scan the entry names in archive order for a whole-name match
//! 3. Read the matched entry and take its `%FILENAME%` value
//!
//! Resolution only reads the raw buffer and the index, so a failure for one
//! name leaves both untouched for the next.

mod error;
mod pattern;

pub use error::{ResolveError, ResolveResult};
pub use pattern::{
    DESCRIPTOR_FILE, EntryMatcher, MINGW64_PACKAGE_PREFIX, MINGW64_REPOSITORY, PackagePattern,
    repository_prefix,
};

use crate::descriptor::PackageDescriptor;
use crate::tar::{ArchiveIndex, list_names};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Choice among several descriptor entries matching one pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TieBreak {
    /// First match in archive order
    #[default]
    FirstInArchive,
    /// Lexicographically greatest matching entry name
    GreatestName,
}

impl TieBreak {
    /// Short name used on the command line
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstInArchive => "first",
            Self::GreatestName => "greatest",
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::FirstInArchive),
            "greatest" => Ok(Self::GreatestName),
            other => Err(format!(
                "unknown tie-break '{other}', expected first or greatest"
            )),
        }
    }
}

/// Resolution options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Policy when several entries match
    pub tie_break: TieBreak,
}

/// Outcome of one successful resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPackage {
    /// Repository the name was resolved in
    pub repository: String,
    /// Package pattern as requested
    pub requested_name: String,
    /// Descriptor entry that matched
    pub entry_name: String,
    /// Distributable file name from `%FILENAME%`
    pub file_name: String,
}

impl fmt::Display for ResolvedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.repository, self.requested_name, self.file_name
        )
    }
}

/// Resolver over one raw tar buffer and its index
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    index: &'a ArchiveIndex,
    data: &'a [u8],
    repository: &'a str,
    options: ResolveOptions,
}

impl<'a> Resolver<'a> {
    /// Create a resolver with default options
    pub fn new(index: &'a ArchiveIndex, data: &'a [u8], repository: &'a str) -> Self {
        Self {
            index,
            data,
            repository,
            options: ResolveOptions::default(),
        }
    }

    /// Replace the options
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Repository this resolver searches
    pub fn repository(&self) -> &str {
        self.repository
    }

    /// Name of the descriptor entry matching `pattern`
    pub fn find_descriptor(&self, pattern: &PackagePattern) -> ResolveResult<&'a str> {
        let matcher = EntryMatcher::new(self.repository, pattern)?;
        let mut matches = list_names(self.index).filter(|name| matcher.is_match(name));

        let found = match self.options.tie_break {
            TieBreak::FirstInArchive => matches.next(),
            TieBreak::GreatestName => {
                let candidates: Vec<&str> = matches.collect();
                if candidates.len() > 1 {
                    warn!(
                        repository = self.repository,
                        pattern = %pattern,
                        candidates = ?candidates,
                        "several descriptors match, picking the greatest name"
                    );
                }
                candidates.into_iter().max()
            }
        };

        found.ok_or_else(|| ResolveError::PackageNotFound {
            repository: self.repository.to_string(),
            pattern: pattern.as_str().to_string(),
        })
    }

    /// Parsed descriptor of an entry
    pub fn descriptor(&self, entry_name: &str) -> ResolveResult<PackageDescriptor> {
        let payload = self.index.read_entry(self.data, entry_name)?;
        Ok(PackageDescriptor::from_bytes(payload))
    }

    /// Resolve one package pattern to its file name
    pub fn resolve(&self, pattern: &PackagePattern) -> ResolveResult<ResolvedPackage> {
        let entry_name = self.find_descriptor(pattern)?;
        let descriptor = self.descriptor(entry_name)?;
        let file_name =
            descriptor
                .file_name()
                .map_err(|source| ResolveError::DescriptorFieldMissing {
                    repository: self.repository.to_string(),
                    entry: entry_name.to_string(),
                    source,
                })?;

        debug!(
            repository = self.repository,
            pattern = %pattern,
            entry = entry_name,
            file_name,
            "resolved package"
        );

        Ok(ResolvedPackage {
            repository: self.repository.to_string(),
            requested_name: pattern.as_str().to_string(),
            entry_name: entry_name.to_string(),
            file_name: file_name.to_string(),
        })
    }

    /// Resolve several patterns in order, one result per pattern
    pub fn resolve_all<'p, I>(&self, patterns: I) -> Vec<ResolveResult<ResolvedPackage>>
    where
        I: IntoIterator<Item = &'p PackagePattern>,
    {
        patterns
            .into_iter()
            .map(|pattern| self.resolve(pattern))
            .collect()
    }
}

/// Resolve one pattern with default options
pub fn resolve(
    index: &ArchiveIndex,
    data: &[u8],
    repository: &str,
    pattern: &PackagePattern,
) -> ResolveResult<ResolvedPackage> {
    Resolver::new(index, data, repository).resolve(pattern)
}
