//! Capability traits for design-time components.
//!
//! A configuration entity composes two capabilities:
//!
//! - [`Serializable`] - its design-time XML form
//! - [`Persistable`] - change tracking plus the database walk
//!
//! State changes are never inferred. An entity that mutates a persisted field
//! must call [`Persistable::mark_modified`] itself; deleting goes through
//! [`Persistable::mark_deleted`].

use designstore_foundation::{
    ComponentState, CorrelationId, Element, RelationContext, Result, SurrogateId,
    dataset_name, foreign_key_attribute,
};

use crate::action::ActionFragment;
use crate::loader::ComponentLoader;
use crate::session::PersistSession;
use crate::tracking::Tracking;

/// A component with a design-time XML form.
pub trait Serializable {
    /// Name of the element this component serializes to.
    fn element_name(&self) -> &str;

    /// Serializes the component, including its tracking attributes.
    fn to_xml(&self) -> Element;

    /// Replaces this component's contents with those of `element`.
    ///
    /// # Errors
    ///
    /// Returns an unknown node type error if `element` has the wrong shape.
    fn from_xml(&mut self, element: &Element) -> Result<()>;
}

/// A change-tracked unit of persisted state.
pub trait Persistable: Serializable {
    /// Returns the tracking record.
    fn tracking(&self) -> &Tracking;

    /// Returns the tracking record mutably.
    fn tracking_mut(&mut self) -> &mut Tracking;

    /// Stable short identifier of the entity kind.
    ///
    /// Used as the allocation key and for the default naming conventions.
    fn component_type(&self) -> &str {
        self.tracking().component_type()
    }

    /// Name of the query dataset the loader should read children from.
    fn dataset_name(&self) -> String {
        dataset_name(self.component_type())
    }

    /// Name of the foreign-key attribute children use to point at this component.
    fn foreign_key_attribute(&self) -> String {
        foreign_key_attribute(self.component_type())
    }

    /// Returns the correlation id.
    fn id(&self) -> &CorrelationId {
        self.tracking().id()
    }

    /// Returns the surrogate id.
    fn surrogate_id(&self) -> SurrogateId {
        self.tracking().surrogate_id()
    }

    /// Returns the lifecycle state.
    fn state(&self) -> ComponentState {
        self.tracking().state()
    }

    /// Returns true if persisting produces an `INSERT`.
    fn is_insert(&self) -> bool {
        self.state().is_insert()
    }

    /// Returns true if persisting produces an `UPDATE`.
    fn is_update(&self) -> bool {
        self.state().is_update()
    }

    /// Returns true if persisting produces a `DELETE`.
    fn is_delete(&self) -> bool {
        self.state().is_delete()
    }

    /// Returns true if the component was deleted before it was ever persisted.
    fn is_discarded(&self) -> bool {
        self.state().is_discarded()
    }

    /// Records that a persisted field changed.
    ///
    /// # Errors
    ///
    /// Returns a precondition violation if the component is marked for deletion.
    fn mark_modified(&mut self) -> Result<()> {
        self.tracking_mut().request_update()
    }

    /// Marks the component for deletion.
    fn mark_deleted(&mut self) {
        self.tracking_mut().request_delete();
    }

    /// Marks the component as (re)inserted.
    fn mark_inserted(&mut self) {
        self.tracking_mut().request_insert();
    }

    /// Marks the component, and anything it owns, as matching the backend.
    fn set_unchanged(&mut self) {
        self.tracking_mut().set_unchanged();
    }

    /// Relation context children of this component are persisted under.
    fn child_context(&self, relation: &RelationContext) -> RelationContext {
        relation.extend(self.component_type(), self.surrogate_id())
    }

    /// Emits this component's action, if it has one.
    ///
    /// Composite entities override this to call [`persist_component`] and
    /// then recurse into their children with [`Persistable::child_context`].
    ///
    /// # Errors
    ///
    /// Returns a database component failure if surrogate id allocation fails.
    fn to_database_xml(
        &mut self,
        session: &mut PersistSession<'_>,
        relation: &RelationContext,
    ) -> Result<()> {
        persist_component(self, session, relation)
    }

    /// Rehydrates this component from a backend record.
    ///
    /// The default reads the design-time form and forces `UNCHANGED`.
    /// Composite entities override this to also pull their children through
    /// `loader`, and must set `UNCHANGED` afterwards themselves.
    ///
    /// # Errors
    ///
    /// Returns an unknown node type error if `element` has the wrong shape.
    fn from_database_xml(
        &mut self,
        element: &Element,
        loader: &dyn ComponentLoader,
        relation: &RelationContext,
    ) -> Result<()> {
        let _ = (loader, relation);
        self.from_xml(element)?;
        self.set_unchanged();
        Ok(())
    }
}

/// Emits the action fragment for a single component, without recursing.
///
/// `UNCHANGED` and `DISCARDED` components emit nothing. A `NEW` component is
/// allocated its surrogate id first, so the payload carries the real key. An
/// id handed out by an earlier, failed or unacknowledged walk is reused.
///
/// # Errors
///
/// Returns a database component failure if allocation fails.
pub fn persist_component<C>(
    component: &mut C,
    session: &mut PersistSession<'_>,
    relation: &RelationContext,
) -> Result<()>
where
    C: Persistable + ?Sized,
{
    let Some(kind) = component.state().action() else {
        return Ok(());
    };
    if component.is_insert() && !component.surrogate_id().is_allocated() {
        component.tracking_mut().allocate(session.allocator())?;
    }
    let payload = component.to_xml();
    session.emit(ActionFragment::new(
        kind,
        component.component_type(),
        relation.clone(),
        payload,
    ));
    Ok(())
}
