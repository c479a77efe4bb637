//! Length-capped lists.

use std::collections::HashSet;
use std::hash::Hash;
use std::ops::Deref;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::DomainValidationError;

/// A `Vec` that never holds more than `MAX` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedVec<T, const MAX: usize>(Vec<T>);

impl<T, const MAX: usize> BoundedVec<T, MAX> {
    /// Largest accepted length.
    pub const CAPACITY: usize = MAX;

    /// Wraps `items`, rejecting lists longer than `MAX`.
    pub fn new(field: &'static str, items: Vec<T>) -> Result<Self, DomainValidationError> {
        if items.len() > MAX {
            return Err(DomainValidationError::TooMany {
                field,
                max: MAX,
                actual: items.len(),
            });
        }
        Ok(Self(items))
    }

    /// Returns an empty list.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Consumes the wrapper and returns the entries.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T: Eq + Hash, const MAX: usize> BoundedVec<T, MAX> {
    /// Fails if any entry appears more than once.
    pub fn ensure_unique(&self, field: &'static str) -> Result<(), DomainValidationError> {
        let mut seen = HashSet::with_capacity(self.0.len());
        if self.0.iter().all(|item| seen.insert(item)) {
            Ok(())
        } else {
            Err(DomainValidationError::Duplicate { field })
        }
    }
}

impl<T, const MAX: usize> Default for BoundedVec<T, MAX> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, const MAX: usize> Deref for BoundedVec<T, MAX> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T: Serialize, const MAX: usize> Serialize for BoundedVec<T, MAX> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>, const MAX: usize> Deserialize<'de> for BoundedVec<T, MAX> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<T>::deserialize(deserializer)?;
        Self::new("list", items).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_overage() {
        let err = BoundedVec::<u8, 2>::new("ids", vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            DomainValidationError::TooMany {
                field: "ids",
                max: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_deserialize_enforces_cap() {
        assert!(serde_json::from_str::<BoundedVec<u8, 2>>("[1,2]").is_ok());
        assert!(serde_json::from_str::<BoundedVec<u8, 2>>("[1,2,3]").is_err());
    }

    #[test]
    fn test_ensure_unique() {
        let list = BoundedVec::<u8, 4>::new("ids", vec![1, 2, 1]).unwrap();
        assert_eq!(
            list.ensure_unique("ids").unwrap_err(),
            DomainValidationError::Duplicate { field: "ids" }
        );
        let list = BoundedVec::<u8, 4>::new("ids", vec![1, 2, 3]).unwrap();
        assert!(list.ensure_unique("ids").is_ok());
    }
}
