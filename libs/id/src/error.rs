//! Error types for ID parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The ID string is empty.
    #[error("ID cannot be empty")]
    Empty,

    /// The ID does not have exactly 26 characters.
    #[error("ID must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The ID contains a character outside the Crockford base32 alphabet.
    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    /// The ID encodes a value larger than 128 bits.
    #[error("ID value overflows 128 bits")]
    Overflow,
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty)
    }

    /// Returns true if the input had the wrong shape (length or alphabet).
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            IdError::InvalidLength { .. } | IdError::InvalidCharacter { .. }
        )
    }
}
