//! Descriptor error types

use thiserror::Error;

/// Errors raised when a required descriptor field is unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// No `%FIELD%` marker line for the field
    #[error("descriptor has no %{0}% field")]
    MissingField(String),

    /// The marker line is present but no value line follows it
    #[error("descriptor field %{0}% has no value")]
    EmptyField(String),
}

/// Result type for descriptor lookups
pub type DescriptorResult<T> = Result<T, DescriptorError>;
