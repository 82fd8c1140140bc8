//! Package descriptor (`desc`) files
//!
//! Each package version in a repository database has a `desc` entry made of
//! field blocks:
//!
//! ```text
//! %FILENAME%
//! curl-8.5.0-1-x86_64.pkg.tar.zst
//!
//! %DEPENDS%
//! ca-certificates
//! zlib
//! ```
//!
//! A block is a `%NAME%` marker line followed by one or more value lines and
//! closed by a blank line (or the next marker). Values are kept verbatim and
//! only [`FILENAME_FIELD`] is interpreted by the resolver.

mod error;

pub use error::{DescriptorError, DescriptorResult};

/// Field holding the distributable package file name
pub const FILENAME_FIELD: &str = "FILENAME";

/// Field holding the package name
pub const NAME_FIELD: &str = "NAME";

/// Field holding the full `epoch:pkgver-pkgrel` version
pub const VERSION_FIELD: &str = "VERSION";

/// Parsed descriptor fields in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDescriptor {
    fields: Vec<(String, Vec<String>)>,
}

impl PackageDescriptor {
    /// Create an empty descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse descriptor text
    ///
    /// Lines outside any field block are ignored. A repeated marker appends
    /// to the values already collected for that field.
    pub fn parse(text: &str) -> Self {
        let mut descriptor = Self::new();
        let mut current: Option<usize> = None;

        for line in text.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if let Some(field) = field_marker(line) {
                current = Some(descriptor.slot(field));
            } else if line.is_empty() {
                current = None;
            } else if let Some(slot) = current {
                descriptor.fields[slot].1.push(line.to_string());
            }
        }

        descriptor
    }

    /// Parse descriptor bytes, replacing invalid UTF-8
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(data))
    }

    /// All values of a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
    }

    /// First value of a field
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)?.first().map(String::as_str)
    }

    /// First value of a field that must be present and non-empty
    pub fn require(&self, field: &str) -> DescriptorResult<&str> {
        let values = self
            .get(field)
            .ok_or_else(|| DescriptorError::MissingField(field.to_string()))?;
        values
            .first()
            .map(String::as_str)
            .ok_or_else(|| DescriptorError::EmptyField(field.to_string()))
    }

    /// Distributable package file name (`%FILENAME%`)
    pub fn file_name(&self) -> DescriptorResult<&str> {
        self.require(FILENAME_FIELD)
    }

    /// Package name (`%NAME%`)
    pub fn name(&self) -> Option<&str> {
        self.first(NAME_FIELD)
    }

    /// Package version (`%VERSION%`)
    pub fn version(&self) -> Option<&str> {
        self.first(VERSION_FIELD)
    }

    /// Fields in file order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field was parsed
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Set a field, replacing any previous values
    pub fn insert<I, S>(&mut self, field: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slot = self.slot(field);
        self.fields[slot].1 = values.into_iter().map(Into::into).collect();
        self
    }

    /// Render back to `desc` text
    pub fn build(&self) -> String {
        let mut output = String::new();
        for (name, values) in &self.fields {
            output.push('%');
            output.push_str(name);
            output.push_str("%\n");
            for value in values {
                output.push_str(value);
                output.push('\n');
            }
            output.push('\n');
        }
        output
    }

    fn slot(&mut self, field: &str) -> usize {
        if let Some(slot) = self.fields.iter().position(|(name, _)| name == field) {
            slot
        } else {
            self.fields.push((field.to_string(), Vec::new()));
            self.fields.len() - 1
        }
    }
}

/// Field name of a `%NAME%` marker line
fn field_marker(line: &str) -> Option<&str> {
    let name = line.strip_prefix('%')?.strip_suffix('%')?;
    (!name.is_empty() && !name.contains(char::is_whitespace) && !name.contains('%'))
        .then_some(name)
}
