//! Strict ULID shape checking and the macro for defining typed IDs.

use crate::IdError;

/// Number of characters in a canonical ULID string.
pub const ULID_LEN: usize = 26;

/// Returns true for characters in the canonical Crockford base32 alphabet.
const fn is_crockford(ch: u8) -> bool {
    matches!(ch, b'0'..=b'9' | b'A'..=b'H' | b'J' | b'K' | b'M' | b'N' | b'P'..=b'T' | b'V'..=b'Z')
}

/// Checks that `s` is shaped like a canonical ULID.
///
/// Lower-case input is rejected: the server only emits the canonical form, so
/// anything else is treated as malformed rather than normalized.
pub fn validate_ulid_str(s: &str) -> Result<(), IdError> {
    if s.is_empty() {
        return Err(IdError::Empty);
    }

    let len = s.chars().count();
    if len != ULID_LEN {
        return Err(IdError::InvalidLength {
            expected: ULID_LEN,
            actual: len,
        });
    }

    if let Some((position, ch)) = s
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii() || !is_crockford(*ch as u8))
    {
        return Err(IdError::InvalidCharacter { ch, position });
    }

    // 26 base32 chars hold 130 bits; the top two must be zero.
    if s.as_bytes()[0] > b'7' {
        return Err(IdError::Overflow);
    }

    Ok(())
}

/// Macro to define a typed ID.
///
/// This generates a newtype wrapper around ULID with:
/// - `new()` to generate a fresh ID
/// - `parse()` to parse from the canonical 26-character string
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` implementations (string form)
/// - `Ord`, `Hash`, and other standard traits
///
/// # Example
///
/// ```ignore
/// define_id!(GuildId);
///
/// let guild_id = GuildId::new();
/// let parsed: GuildId = "01HV4Z2WQXKJNM8GPQY6VBKC3D".parse()?;
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($crate::Ulid);

        impl $name {
            /// Creates a new ID with a fresh ULID.
            #[must_use]
            pub fn new() -> Self {
                Self($crate::Ulid::new())
            }

            /// Creates an ID from a raw ULID.
            #[must_use]
            pub const fn from_ulid(ulid: $crate::Ulid) -> Self {
                Self(ulid)
            }

            /// Returns the underlying ULID.
            #[must_use]
            pub const fn ulid(&self) -> $crate::Ulid {
                self.0
            }

            /// Returns the timestamp portion of the ULID in milliseconds.
            #[must_use]
            pub fn timestamp_ms(&self) -> u64 {
                self.0.timestamp_ms()
            }

            /// Parses an ID from its canonical 26-character form.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                $crate::validate_ulid_str(s)?;
                let ulid = $crate::Ulid::from_string(s).map_err(|_| $crate::IdError::Overflow)?;
                Ok(Self(ulid))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<$crate::Ulid> for $name {
            fn as_ref(&self) -> &$crate::Ulid {
                &self.0
            }
        }
    };
}
