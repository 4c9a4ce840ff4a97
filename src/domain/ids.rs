//! Domain identifier types
//!
//! This module provides the newtype wrapper for animal identifiers so that
//! they cannot be mixed up with page numbers, batch indexes or counts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Animal identifier newtype wrapper
///
/// The animal service issues numeric identifiers. They are serialized as
/// plain JSON numbers, both when read from the source and when loaded to the
/// destination.
///
/// # Examples
///
/// ```
/// use fauna::domain::ids::AnimalId;
/// use std::str::FromStr;
///
/// let id = AnimalId::from_str("42").unwrap();
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimalId(u64);

impl AnimalId {
    /// Creates a new AnimalId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnimalId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| format!("Invalid animal ID '{s}': {e}"))
    }
}

impl From<u64> for AnimalId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
