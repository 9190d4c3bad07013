//! Persistence lifecycle of a database component.
//!
//! The state never changes on its own. Entities request transitions when they
//! mutate persisted fields, and the table below decides the outcome:
//!
//! ```text
//! from \ request   insert      update      delete
//! NEW              NEW         NEW         DISCARDED
//! UNCHANGED        UNCHANGED   MODIFIED    REMOVED
//! MODIFIED         MODIFIED    MODIFIED    REMOVED
//! REMOVED          MODIFIED    (error)     REMOVED
//! DISCARDED        NEW         (error)     DISCARDED
//! ```

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where a component stands relative to the backend store.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum ComponentState {
    /// Constructed in memory, never persisted.
    #[default]
    New,
    /// Matches the backend.
    Unchanged,
    /// Persisted, locally altered.
    Modified,
    /// Persisted, marked for deletion.
    Removed,
    /// Was `New`, then deleted before ever being persisted.
    Discarded,
}

impl ComponentState {
    /// All states, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Unchanged,
        Self::Modified,
        Self::Removed,
        Self::Discarded,
    ];

    /// Returns the attribute spelling of this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Unchanged => "UNCHANGED",
            Self::Modified => "MODIFIED",
            Self::Removed => "REMOVED",
            Self::Discarded => "DISCARDED",
        }
    }

    /// Returns true if persisting this state inserts a row.
    #[must_use]
    pub const fn is_insert(self) -> bool {
        matches!(self, Self::New)
    }

    /// Returns true if persisting this state updates a row.
    #[must_use]
    pub const fn is_update(self) -> bool {
        matches!(self, Self::Modified)
    }

    /// Returns true if persisting this state deletes a row.
    #[must_use]
    pub const fn is_delete(self) -> bool {
        matches!(self, Self::Removed)
    }

    /// Returns true if this component was dropped before it was ever persisted.
    #[must_use]
    pub const fn is_discarded(self) -> bool {
        matches!(self, Self::Discarded)
    }

    /// The action persisting this state produces, if any.
    #[must_use]
    pub const fn action(self) -> Option<ActionKind> {
        match self {
            Self::New => Some(ActionKind::Insert),
            Self::Modified => Some(ActionKind::Update),
            Self::Removed => Some(ActionKind::Delete),
            Self::Unchanged | Self::Discarded => None,
        }
    }

    /// State after an insert request.
    #[must_use]
    pub const fn after_insert(self) -> Self {
        match self {
            Self::New | Self::Discarded => Self::New,
            Self::Unchanged => Self::Unchanged,
            Self::Modified | Self::Removed => Self::Modified,
        }
    }

    /// State after an update request.
    ///
    /// # Errors
    ///
    /// Returns a precondition violation for components already marked for deletion.
    pub fn after_update(self) -> Result<Self> {
        match self {
            Self::New => Ok(Self::New),
            Self::Unchanged | Self::Modified => Ok(Self::Modified),
            Self::Removed | Self::Discarded => Err(Error::precondition(format!(
                "cannot modify a component in state {self}"
            ))),
        }
    }

    /// State after a delete request.
    #[must_use]
    pub const fn after_delete(self) -> Self {
        match self {
            Self::New | Self::Discarded => Self::Discarded,
            Self::Unchanged | Self::Modified | Self::Removed => Self::Removed,
        }
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| Error::invalid_attribute("componentState", s))
    }
}

/// Kind of database action a changed component produces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum ActionKind {
    /// Insert a new row.
    Insert,
    /// Update an existing row.
    Update,
    /// Delete an existing row.
    Delete,
}

impl ActionKind {
    /// Returns the `type` attribute spelling of this action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            other => Err(Error::invalid_attribute("type", other)),
        }
    }
}
