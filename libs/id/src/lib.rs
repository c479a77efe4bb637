//! # hearth-id
//!
//! Typed, ULID-backed identifiers for hearth chat entities.
//!
//! ## Design Principles
//!
//! - Every entity ID is a bare 26-character ULID on the wire
//! - Parsing is strict: canonical upper-case Crockford base32 only
//! - IDs are typed so a `GuildId` can never be passed where a `ChannelId` is expected
//! - IDs roundtrip exactly (parse → format → parse)
//!
//! ## ID Format
//!
//! `01HV4Z2WQXKJNM8GPQY6VBKC3D`
//!
//! The alphabet is `0123456789ABCDEFGHJKMNPQRSTVWXYZ` (no `I`, `L`, `O`, `U`).
//! The first character is at most `7`, since a ULID is 128 bits.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use macros::{validate_ulid_str, ULID_LEN};
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
