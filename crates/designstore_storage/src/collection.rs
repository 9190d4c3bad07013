//! Collections of database components with deletion bookkeeping.
//!
//! A [`DatabaseComponentCollection`] keeps two sequences:
//! - live members, currently part of the aggregate
//! - pending deletions, removed since load and kept only so their `DELETE`
//!   action is not lost
//!
//! A member is in exactly one of them at any time. Members are built through
//! a factory fixed at construction time.

use std::fmt;
use std::sync::Arc;

use designstore_foundation::{CorrelationId, Element, Error, RelationContext, Result};

use crate::component::{Persistable, Serializable};
use crate::loader::ComponentLoader;
use crate::session::PersistSession;
use crate::tracking::Tracking;
use crate::validation::{Validate, ValidationContext};

/// Builds a blank member, ready to be filled from XML.
pub type MemberFactory<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// An ordered set of database components of one type.
///
/// The collection is a component in its own right, of type `<member>List`,
/// so the relation key it adds for its members never reads as the members'
/// own foreign key.
pub struct DatabaseComponentCollection<T: Persistable> {
    tracking: Tracking,
    member_type: &'static str,
    element_name: String,
    dataset_name: String,
    factory: MemberFactory<T>,
    live: Vec<T>,
    deleted: Vec<T>,
}

impl<T: Persistable> DatabaseComponentCollection<T> {
    /// Creates an empty collection of `member_type` members.
    ///
    /// The collection's own component type and its default element name are
    /// `<member_type>List`; the dataset name defaults to `get<member_type>`.
    ///
    /// # Panics
    ///
    /// Panics if `member_type` is empty.
    pub fn new<F>(id: CorrelationId, member_type: &'static str, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let list_type = format!("{member_type}List");
        Self {
            tracking: Tracking::new(list_type.clone(), id),
            member_type,
            element_name: list_type,
            dataset_name: designstore_foundation::dataset_name(member_type),
            factory: Arc::new(factory),
            live: Vec::new(),
            deleted: Vec::new(),
        }
    }

    /// Builder method to set the element name.
    #[must_use]
    pub fn with_element_name(mut self, name: impl Into<String>) -> Self {
        self.element_name = name.into();
        self
    }

    /// Builder method to set the dataset name.
    #[must_use]
    pub fn with_dataset_name(mut self, name: impl Into<String>) -> Self {
        self.dataset_name = name.into();
        self
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Appends a new member.
    ///
    /// # Errors
    ///
    /// Returns a precondition violation unless `member` is `NEW`.
    pub fn add(&mut self, member: T) -> Result<()> {
        if !member.is_insert() {
            return Err(Error::precondition(format!(
                "only NEW components can be added to {}, got {} {} in state {}",
                self.element_name,
                member.component_type(),
                member.id(),
                member.state()
            )));
        }
        self.live.push(member);
        Ok(())
    }

    /// Removes the live member with the given correlation id.
    ///
    /// # Errors
    ///
    /// Returns a precondition violation if no live member has that id.
    pub fn remove(&mut self, id: &CorrelationId) -> Result<()> {
        let index = self.position(id).ok_or_else(|| {
            Error::precondition(format!("{} has no member {id}", self.element_name))
        })?;
        self.remove_at(index)
    }

    /// Removes the live member at `index`.
    ///
    /// The member is marked deleted first, so a member that was never
    /// persisted becomes `DISCARDED` rather than `REMOVED`.
    ///
    /// # Errors
    ///
    /// Returns a precondition violation if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Result<()> {
        if index >= self.live.len() {
            return Err(Error::precondition(format!(
                "index {index} out of bounds for {} of length {}",
                self.element_name,
                self.live.len()
            )));
        }
        let mut member = self.live.remove(index);
        member.mark_deleted();
        tracing::trace!(
            collection = %self.element_name,
            id = %member.id(),
            state = %member.state(),
            "member moved to pending deletions"
        );
        if member.is_discarded() && member.surrogate_id().is_allocated() {
            tracing::debug!(
                component_type = member.component_type(),
                id = %member.id(),
                surrogate_id = %member.surrogate_id(),
                "discarded member abandons its surrogate id"
            );
        }
        self.deleted.push(member);
        Ok(())
    }

    /// Returns the number of live members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns true if there are no live members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Returns the live member at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.live.get(index)
    }

    /// Returns the live member at `index` for in-place edits.
    ///
    /// Edits must go through the member's own setters so it marks itself
    /// modified. The member must not be swapped for another instance (for
    /// example with [`std::mem::replace`]): that bypasses the `NEW` check of
    /// [`DatabaseComponentCollection::add`] and the walk would trust whatever
    /// state the replacement carries. Use `remove` and `add` instead.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.live.get_mut(index)
    }

    /// Returns the live member with the given correlation id.
    #[must_use]
    pub fn find(&self, id: &CorrelationId) -> Option<&T> {
        self.live.iter().find(|m| m.id() == id)
    }

    /// Returns the live member with the given correlation id for in-place edits.
    ///
    /// The same obligations as [`DatabaseComponentCollection::get_mut`] apply.
    pub fn find_mut(&mut self, id: &CorrelationId) -> Option<&mut T> {
        self.live.iter_mut().find(|m| m.id() == id)
    }

    /// Returns the position of the live member with the given correlation id.
    #[must_use]
    pub fn position(&self, id: &CorrelationId) -> Option<usize> {
        self.live.iter().position(|m| m.id() == id)
    }

    /// Iterates over the live members.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.live.iter()
    }

    /// Returns the members removed since load.
    #[must_use]
    pub fn pending_deletions(&self) -> &[T] {
        &self.deleted
    }

    /// Returns the configured dataset name.
    #[must_use]
    pub fn configured_dataset_name(&self) -> &str {
        &self.dataset_name
    }

    /// Returns the component type of the members.
    #[must_use]
    pub fn member_type(&self) -> &'static str {
        self.member_type
    }

    /// Relation context members are persisted and loaded under.
    ///
    /// The collection only adds its own key once it has a surrogate id.
    fn member_context(tracking: &Tracking, relation: &RelationContext) -> RelationContext {
        if tracking.surrogate_id().is_allocated() {
            relation.extend(tracking.component_type(), tracking.surrogate_id())
        } else {
            relation.clone()
        }
    }

    // =========================================================================
    // Backend loading
    // =========================================================================

    /// Pulls this collection's members for `relation` through `loader`.
    ///
    /// Loaded members are appended to the live sequence as `UNCHANGED`.
    /// Returns how many members were loaded.
    ///
    /// # Errors
    ///
    /// Propagates loader failures and member parse failures.
    pub fn load_related(
        &mut self,
        loader: &dyn ComponentLoader,
        relation: &RelationContext,
    ) -> Result<usize> {
        let records =
            loader.get_related_database_components(relation, self.member_type, &self.dataset_name)?;
        let member_relation = Self::member_context(&self.tracking, relation);
        let members = records
            .iter()
            .map(|record| self.hydrate(record, loader, &member_relation))
            .collect::<Result<Vec<_>>>()?;
        self.live.extend(members);
        self.tracking.set_unchanged();
        Ok(records.len())
    }

    fn hydrate(
        &self,
        record: &Element,
        loader: &dyn ComponentLoader,
        relation: &RelationContext,
    ) -> Result<T> {
        let mut member = (self.factory)();
        member
            .from_database_xml(record, loader, relation)
            .map_err(|e| e.in_element(self.element_name.as_str()))?;
        Ok(member)
    }
}

impl<T: Persistable> Serializable for DatabaseComponentCollection<T> {
    fn element_name(&self) -> &str {
        &self.element_name
    }

    /// Live members first, then pending deletions carrying their delete state.
    fn to_xml(&self) -> Element {
        let mut element = Element::new(self.element_name.as_str());
        self.tracking.write_attributes(&mut element);
        self.live
            .iter()
            .chain(&self.deleted)
            .fold(element, |el, member| el.with_child(member.to_xml()))
    }

    /// Rebuilds both sequences from a mixed change-set list.
    ///
    /// Members whose serialized state is `REMOVED` or `DISCARDED` become
    /// pending deletions; everything else is live. On error the collection is
    /// left as it was.
    fn from_xml(&mut self, element: &Element) -> Result<()> {
        element.expect_name(&self.element_name)?;
        let mut tracking = self.tracking.clone();
        tracking.read_attributes(element)?;

        let mut live = Vec::new();
        let mut deleted = Vec::new();
        for child in element.children() {
            let mut member = (self.factory)();
            member
                .from_xml(child)
                .map_err(|e| e.in_element(self.element_name.as_str()))?;
            if member.is_delete() || member.is_discarded() {
                deleted.push(member);
            } else {
                live.push(member);
            }
        }
        self.tracking = tracking;
        self.live = live;
        self.deleted = deleted;
        Ok(())
    }
}

impl<T: Persistable> Persistable for DatabaseComponentCollection<T> {
    fn tracking(&self) -> &Tracking {
        &self.tracking
    }

    fn tracking_mut(&mut self) -> &mut Tracking {
        &mut self.tracking
    }

    fn dataset_name(&self) -> String {
        self.dataset_name.clone()
    }

    /// Marks the collection and every live member `UNCHANGED` and forgets
    /// pending deletions, whose deletes are now considered applied.
    fn set_unchanged(&mut self) {
        self.tracking.set_unchanged();
        for member in &mut self.live {
            member.set_unchanged();
        }
        self.deleted.clear();
    }

    /// Persists every live member, then every pending deletion.
    ///
    /// The collection itself is an aggregate handle and emits no action.
    fn to_database_xml(
        &mut self,
        session: &mut PersistSession<'_>,
        relation: &RelationContext,
    ) -> Result<()> {
        let member_relation = Self::member_context(&self.tracking, relation);
        for member in self.live.iter_mut().chain(self.deleted.iter_mut()) {
            member.to_database_xml(session, &member_relation)?;
        }
        Ok(())
    }

    /// Rebuilds the live sequence from backend records.
    ///
    /// Declared member states are ignored and there are no pending deletions
    /// afterwards. On error the collection is left as it was.
    fn from_database_xml(
        &mut self,
        element: &Element,
        loader: &dyn ComponentLoader,
        relation: &RelationContext,
    ) -> Result<()> {
        element.expect_name(&self.element_name)?;
        let mut tracking = self.tracking.clone();
        tracking.read_attributes(element)?;

        let member_relation = Self::member_context(&tracking, relation);
        let live = element
            .children()
            .iter()
            .map(|child| self.hydrate(child, loader, &member_relation))
            .collect::<Result<Vec<_>>>()?;
        self.tracking = tracking;
        self.live = live;
        self.set_unchanged();
        Ok(())
    }
}

impl<T: Persistable + Validate> Validate for DatabaseComponentCollection<T> {
    fn validate(&self, ctx: &mut ValidationContext) {
        ctx.within(self.element_name.as_str(), |ctx| {
            for member in &self.live {
                ctx.within(format!("{}[{}]", member.element_name(), member.id()), |ctx| {
                    member.validate(ctx);
                });
            }
        });
    }
}

impl<T: Persistable + Clone> Clone for DatabaseComponentCollection<T> {
    fn clone(&self) -> Self {
        Self {
            tracking: self.tracking.clone(),
            member_type: self.member_type,
            element_name: self.element_name.clone(),
            dataset_name: self.dataset_name.clone(),
            factory: Arc::clone(&self.factory),
            live: self.live.clone(),
            deleted: self.deleted.clone(),
        }
    }
}

impl<T: Persistable + fmt::Debug> fmt::Debug for DatabaseComponentCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseComponentCollection")
            .field("tracking", &self.tracking)
            .field("member_type", &self.member_type)
            .field("element_name", &self.element_name)
            .field("dataset_name", &self.dataset_name)
            .field("live", &self.live)
            .field("deleted", &self.deleted)
            .finish_non_exhaustive()
    }
}

impl<'a, T: Persistable> IntoIterator for &'a DatabaseComponentCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.live.iter()
    }
}
