//! Identifiers carried by database components.
//!
//! Every component has two: a correlation id that is only meaningful inside
//! one XML document, and a surrogate id assigned by the backend.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Backend-assigned persistent key.
///
/// `-1` is the sentinel for "not allocated yet". Backend keys are never
/// negative, so any negative value counts as unallocated, and parsing rejects
/// negatives other than `-1`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurrogateId(i64);

impl SurrogateId {
    /// The sentinel value of a component that was never persisted.
    pub const UNALLOCATED: Self = Self(-1);

    /// Wraps a raw key.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw key.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true for a real backend key (zero or positive).
    #[must_use]
    pub const fn is_allocated(self) -> bool {
        self.0 >= 0
    }
}

impl Default for SurrogateId {
    fn default() -> Self {
        Self::UNALLOCATED
    }
}

impl fmt::Debug for SurrogateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_allocated() {
            write!(f, "SurrogateId({})", self.0)
        } else {
            write!(f, "SurrogateId(unallocated)")
        }
    }
}

impl fmt::Display for SurrogateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SurrogateId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<i64>() {
            Ok(raw) if raw >= Self::UNALLOCATED.0 => Ok(Self(raw)),
            _ => Err(Error::invalid_attribute("databaseId", s)),
        }
    }
}

/// Document-scoped correlation id (the `id` attribute).
///
/// Cloning is O(1).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CorrelationId(Arc<str>);

impl CorrelationId {
    /// Creates a correlation id.
    ///
    /// # Errors
    ///
    /// Returns a precondition violation if `id` is empty.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(Error::precondition("correlation id must not be empty"));
        }
        Ok(Self(Arc::from(id)))
    }

    /// Placeholder for a blank component that is about to be filled from XML.
    #[must_use]
    pub fn unassigned() -> Self {
        Self(Arc::from(""))
    }

    /// Returns false for the [`CorrelationId::unassigned`] placeholder.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        !self.0.is_empty()
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorrelationId({:?})", &*self.0)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
