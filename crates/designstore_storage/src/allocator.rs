//! Surrogate id allocation.
//!
//! The backend normally owns its key sequences; [`IdAllocator`] is the seam it
//! plugs into. [`SequenceAllocator`] is the in-process implementation used
//! when no backend sequence is available.

use dashmap::DashMap;
use designstore_foundation::{BoxError, SurrogateId};
use thiserror::Error;

/// Hands out surrogate ids keyed by component type.
///
/// Implementations must be safe to share; one persistence walk calls
/// [`IdAllocator::allocate`] at most once per `NEW` component.
pub trait IdAllocator {
    /// Allocates the next surrogate id for `component_type`.
    ///
    /// # Errors
    ///
    /// Returns the backend's data-access error unchanged; callers wrap it.
    fn allocate(&self, component_type: &str) -> Result<SurrogateId, BoxError>;
}

impl<F> IdAllocator for F
where
    F: Fn(&str) -> Result<SurrogateId, BoxError>,
{
    fn allocate(&self, component_type: &str) -> Result<SurrogateId, BoxError> {
        self(component_type)
    }
}

/// Failures of the in-process sequence allocator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// The counter for a component type cannot advance any further.
    #[error("sequence for {component_type} is exhausted")]
    Exhausted {
        /// Component type whose counter overflowed.
        component_type: String,
    },
}

/// One monotonically increasing counter per component type.
#[derive(Debug)]
pub struct SequenceAllocator {
    start: i64,
    next: DashMap<String, i64>,
}

impl Default for SequenceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceAllocator {
    /// Creates an allocator whose sequences start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates an allocator whose sequences start at `start`.
    #[must_use]
    pub fn starting_at(start: i64) -> Self {
        Self {
            start,
            next: DashMap::new(),
        }
    }

    /// Returns the id the next allocation for `component_type` will yield.
    #[must_use]
    pub fn peek(&self, component_type: &str) -> i64 {
        self.next
            .get(component_type)
            .map_or(self.start, |next| *next)
    }

    /// Returns how many ids have been handed out for `component_type`.
    #[must_use]
    pub fn allocated(&self, component_type: &str) -> i64 {
        self.peek(component_type) - self.start
    }
}

impl IdAllocator for SequenceAllocator {
    fn allocate(&self, component_type: &str) -> Result<SurrogateId, BoxError> {
        let mut next = self
            .next
            .entry(component_type.to_string())
            .or_insert(self.start);
        let id = *next;
        *next = id.checked_add(1).ok_or_else(|| SequenceError::Exhausted {
            component_type: component_type.to_string(),
        })?;
        Ok(SurrogateId::new(id))
    }
}
