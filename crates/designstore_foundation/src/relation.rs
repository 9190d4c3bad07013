//! Relation contexts: the ancestor key chain threaded through persistence walks.
//!
//! A thin wrapper around `im::Vector`. Extending a context returns a new one
//! that shares structure with the original, so a child can be handed its own
//! extension without any sibling ever observing it.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::id::SurrogateId;

/// Default query dataset name for a component type (`get<type>`).
#[must_use]
pub fn dataset_name(component_type: &str) -> String {
    format!("get{component_type}")
}

/// Default foreign-key attribute name for a component type (`<type>_id`).
#[must_use]
pub fn foreign_key_attribute(component_type: &str) -> String {
    format!("{component_type}_id")
}

/// One link of a relation context.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelationKey {
    /// Component type of the ancestor.
    pub component_type: Arc<str>,
    /// Surrogate id of the ancestor.
    pub id: SurrogateId,
}

impl RelationKey {
    /// Creates a relation key.
    #[must_use]
    pub fn new(component_type: &str, id: SurrogateId) -> Self {
        Self {
            component_type: Arc::from(component_type),
            id,
        }
    }

    /// Foreign-key attribute name this link maps to.
    #[must_use]
    pub fn foreign_key(&self) -> String {
        foreign_key_attribute(&self.component_type)
    }
}

impl fmt::Display for RelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.component_type, self.id)
    }
}

/// Ordered chain of (component type, surrogate id) pairs, root first.
///
/// Cloning is O(1). [`RelationContext::extend`] never mutates `self`.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelationContext(im::Vector<RelationKey>);

impl RelationContext {
    /// Creates an empty context (the root of a walk).
    #[must_use]
    pub fn new() -> Self {
        Self(im::Vector::new())
    }

    /// Returns a new context with `(component_type, id)` appended as the leaf.
    #[must_use]
    pub fn extend(&self, component_type: &str, id: SurrogateId) -> Self {
        let mut chain = self.0.clone();
        chain.push_back(RelationKey::new(component_type, id));
        Self(chain)
    }

    /// Returns the number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if this is a root context.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the links, root first.
    pub fn iter(&self) -> impl Iterator<Item = &RelationKey> {
        self.0.iter()
    }

    /// Returns the outermost ancestor.
    #[must_use]
    pub fn root(&self) -> Option<&RelationKey> {
        self.0.front()
    }

    /// Returns the direct parent of the node being processed.
    #[must_use]
    pub fn leaf(&self) -> Option<&RelationKey> {
        self.0.back()
    }

    /// Surrogate id of the nearest ancestor of the given type.
    #[must_use]
    pub fn surrogate_id_of(&self, component_type: &str) -> Option<SurrogateId> {
        self.0
            .iter()
            .rev()
            .find(|key| &*key.component_type == component_type)
            .map(|key| key.id)
    }

    /// Foreign-key attribute name and value for every link, root first.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (String, SurrogateId)> + '_ {
        self.0.iter().map(|key| (key.foreign_key(), key.id))
    }
}

impl fmt::Debug for RelationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for RelationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("/");
        }
        for key in self.iter() {
            write!(f, "/{key}")?;
        }
        Ok(())
    }
}

impl FromIterator<RelationKey> for RelationContext {
    fn from_iter<I: IntoIterator<Item = RelationKey>>(iter: I) -> Self {
        Self(im::Vector::from_iter(iter))
    }
}

impl<'a> IntoIterator for &'a RelationContext {
    type Item = &'a RelationKey;
    type IntoIter = im::vector::Iter<'a, RelationKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
