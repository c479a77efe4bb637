//! # hearth-domain
//!
//! Validated chat and auth types built from untrusted input.
//!
//! ## Design Principles
//!
//! - Fail closed: any missing, malformed, or out-of-range field rejects the whole value
//! - Scalars are newtypes with validating constructors (`*_from_input`)
//! - Structured records are parsed from REST JSON (`*_from_response`)
//! - Closed sets (roles, permissions, token kinds) are enums, never free strings
//!
//! Parsed records serialize with camelCase field names; the wire uses snake_case.

mod bounded;
mod error;
mod macros;
mod text;

pub mod auth;
pub mod chat;
pub mod dto;
pub mod markdown;

pub use bounded::BoundedVec;
pub use error::DomainValidationError;

#[doc(hidden)]
pub use serde as __serde;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parses a canonical ULID into a typed ID, naming `field` on failure.
pub fn id_from_input<T>(field: &'static str, raw: &str) -> Result<T, DomainValidationError>
where
    T: std::str::FromStr<Err = hearth_id::IdError>,
{
    raw.parse()
        .map_err(|source| DomainValidationError::InvalidId { field, source })
}

/// Deserializes a response DTO, mapping any failure to [`DomainValidationError::Malformed`].
pub fn from_response<T: DeserializeOwned>(
    dto: &'static str,
    value: &Value,
) -> Result<T, DomainValidationError> {
    <T as serde::Deserialize>::deserialize(value)
        .map_err(|err| DomainValidationError::malformed(dto, err))
}
