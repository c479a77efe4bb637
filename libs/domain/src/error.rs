//! Error types for domain validation.

use hearth_id::IdError;
use thiserror::Error;

/// Longest slice of an offending value echoed back in an error message.
const MAX_ECHOED_VALUE_CHARS: usize = 64;

/// Errors produced when untrusted input fails domain validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainValidationError {
    /// A string is shorter or longer than allowed.
    #[error("{field} must be between {min} and {max} characters, got {actual}")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// A string contains characters or structure that is not allowed.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// A number lies outside its permitted range.
    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
        actual: u64,
    },

    /// A list carries more entries than allowed.
    #[error("{field} must have at most {max} entries, got {actual}")]
    TooMany {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// A list that must hold distinct values repeats one.
    #[error("{field} contains duplicate entries")]
    Duplicate { field: &'static str },

    /// A value is not a member of a closed set.
    #[error("{field} has unknown value {value:?}")]
    UnknownVariant { field: &'static str, value: String },

    /// An ID is not a canonical ULID.
    #[error("invalid {field}: {source}")]
    InvalidId {
        field: &'static str,
        #[source]
        source: IdError,
    },

    /// An update carries no updated fields.
    #[error("{field} must contain at least one updated field")]
    EmptyUpdate { field: &'static str },

    /// Two fields that must agree do not.
    #[error("{field} is inconsistent: {reason}")]
    Inconsistent {
        field: &'static str,
        reason: &'static str,
    },

    /// A structured response failed to parse.
    #[error("invalid {dto} response: {reason}")]
    Malformed { dto: &'static str, reason: String },
}

impl DomainValidationError {
    /// Creates an unknown variant error, truncating the echoed value.
    pub fn unknown_variant(field: &'static str, value: &str) -> Self {
        DomainValidationError::UnknownVariant {
            field,
            value: value.chars().take(MAX_ECHOED_VALUE_CHARS).collect(),
        }
    }

    /// Creates a malformed response error from a deserialization failure.
    pub fn malformed(dto: &'static str, err: impl std::fmt::Display) -> Self {
        DomainValidationError::Malformed {
            dto,
            reason: err.to_string(),
        }
    }

    /// Returns the name of the field (or DTO) that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            DomainValidationError::InvalidLength { field, .. }
            | DomainValidationError::InvalidFormat { field, .. }
            | DomainValidationError::OutOfRange { field, .. }
            | DomainValidationError::TooMany { field, .. }
            | DomainValidationError::Duplicate { field }
            | DomainValidationError::UnknownVariant { field, .. }
            | DomainValidationError::InvalidId { field, .. }
            | DomainValidationError::EmptyUpdate { field }
            | DomainValidationError::Inconsistent { field, .. } => field,
            DomainValidationError::Malformed { dto, .. } => dto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_truncates() {
        let long = "x".repeat(500);
        let err = DomainValidationError::unknown_variant("role", &long);
        match err {
            DomainValidationError::UnknownVariant { value, .. } => assert_eq!(value.len(), 64),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_field_name() {
        let err = DomainValidationError::EmptyUpdate {
            field: "updated_fields",
        };
        assert_eq!(err.field(), "updated_fields");
        assert_eq!(
            err.to_string(),
            "updated_fields must contain at least one updated field"
        );
    }
}
