//! # Identity Newtypes
//!
//! Store-assigned identifiers and the validated resource type name.
//!
//! Ids are `i32` because both tables use `SERIAL` primary keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Width of the `resource_types.name` column.
pub const MAX_RESOURCE_TYPE_NAME_LEN: usize = 255;

/// Identifier of a registered resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceTypeId(pub i32);

/// Identifier of an admitted resource datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDatumId(pub i32);

impl ResourceTypeId {
    /// Access the raw integer key.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl ResourceDatumId {
    /// Access the raw integer key.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ResourceTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource-type:{}", self.0)
    }
}

impl fmt::Display for ResourceDatumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource-datum:{}", self.0)
    }
}

/// Unique name of a resource type.
///
/// Names are used verbatim as lookup keys (no trimming or case folding):
/// `"Order"` and `"order"` are different types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceTypeName(String);

impl ResourceTypeName {
    /// Validate and wrap a resource type name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for empty or whitespace-only
    /// input and [`ValidationError::NameTooLong`] when the name has more
    /// than [`MAX_RESOURCE_TYPE_NAME_LEN`] characters.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let len = name.chars().count();
        if len > MAX_RESOURCE_TYPE_NAME_LEN {
            return Err(ValidationError::NameTooLong {
                max: MAX_RESOURCE_TYPE_NAME_LEN,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the newtype and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for ResourceTypeName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ResourceTypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
