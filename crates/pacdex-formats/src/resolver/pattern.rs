//! Package-name patterns and descriptor-entry matching

use super::error::{ResolveError, ResolveResult};
use regex::Regex;
use std::borrow::Cow;
use std::fmt;

/// Repository whose package names carry a toolchain prefix
pub const MINGW64_REPOSITORY: &str = "mingw64";

/// Prefix of every package name in [`MINGW64_REPOSITORY`]
pub const MINGW64_PACKAGE_PREFIX: &str = "mingw-w64-x86_64-";

/// File name of the descriptor inside each package directory
pub const DESCRIPTOR_FILE: &str = "desc";

/// Requested package name
///
/// A literal pattern matches its text exactly, so names such as `libc++` need
/// no escaping. A regex pattern is a regular-expression fragment spliced into
/// the entry matcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackagePattern {
    /// Plain package name
    Literal(String),
    /// Regular-expression fragment
    Regex(String),
}

impl PackagePattern {
    /// Literal package name
    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    /// Regular-expression fragment
    pub fn regex(fragment: impl Into<String>) -> Self {
        Self::Regex(fragment.into())
    }

    /// Pattern text as requested
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(text) | Self::Regex(text) => text,
        }
    }

    /// Pattern text as a regular-expression fragment
    fn fragment(&self) -> Cow<'_, str> {
        match self {
            Self::Literal(text) => Cow::Owned(regex::escape(text)),
            Self::Regex(text) => Cow::Borrowed(text),
        }
    }
}

impl From<&str> for PackagePattern {
    fn from(name: &str) -> Self {
        Self::literal(name)
    }
}

impl From<String> for PackagePattern {
    fn from(name: String) -> Self {
        Self::Literal(name)
    }
}

impl fmt::Display for PackagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Package-name prefix a repository applies to every package
pub fn repository_prefix(repository: &str) -> &'static str {
    if repository == MINGW64_REPOSITORY {
        MINGW64_PACKAGE_PREFIX
    } else {
        ""
    }
}

/// Whole-name matcher for `<prefix><pattern><anything>/desc` entries
///
/// `<anything>` stays inside the package directory: it never matches `/`.
#[derive(Debug, Clone)]
pub struct EntryMatcher {
    regex: Regex,
}

impl EntryMatcher {
    /// Build the matcher for a repository and pattern
    pub fn new(repository: &str, pattern: &PackagePattern) -> ResolveResult<Self> {
        let source = format!(
            "^{prefix}(?:{fragment})[^/]*/{file}$",
            prefix = regex::escape(repository_prefix(repository)),
            fragment = pattern.fragment(),
            file = regex::escape(DESCRIPTOR_FILE),
        );
        let regex = Regex::new(&source).map_err(|source| ResolveError::InvalidPattern {
            pattern: pattern.as_str().to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Whether the whole entry name matches
    pub fn is_match(&self, entry_name: &str) -> bool {
        self.regex.is_match(entry_name)
    }
}
