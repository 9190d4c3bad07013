//! The persistence record every database component embeds.
//!
//! A [`Tracking`] holds the component type, the correlation id, the surrogate
//! id, and the lifecycle state. Entities own one and hand it out through
//! [`crate::Persistable::tracking`].

use std::borrow::Cow;

use designstore_foundation::{
    ComponentState, CorrelationId, Element, Error, Result, SurrogateId,
};

use crate::allocator::IdAllocator;

/// Attribute holding the correlation id.
pub const ID_ATTRIBUTE: &str = "id";
/// Attribute holding the surrogate id.
pub const DATABASE_ID_ATTRIBUTE: &str = "databaseId";
/// Attribute holding the component state.
pub const STATE_ATTRIBUTE: &str = "componentState";

/// Identity and change state of one database component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tracking {
    component_type: Cow<'static, str>,
    id: CorrelationId,
    surrogate_id: SurrogateId,
    state: ComponentState,
}

impl Tracking {
    /// Creates tracking for a component built in memory (`NEW`, unallocated).
    ///
    /// # Panics
    ///
    /// Panics if `component_type` is empty. Every entity must declare one.
    #[must_use]
    pub fn new(component_type: impl Into<Cow<'static, str>>, id: CorrelationId) -> Self {
        let component_type = component_type.into();
        assert!(
            !component_type.is_empty(),
            "database components must declare a non-empty component type"
        );
        Self {
            component_type,
            id,
            surrogate_id: SurrogateId::UNALLOCATED,
            state: ComponentState::New,
        }
    }

    /// Creates tracking for a blank component that is about to be read from XML.
    ///
    /// # Panics
    ///
    /// Panics if `component_type` is empty.
    #[must_use]
    pub fn detached(component_type: impl Into<Cow<'static, str>>) -> Self {
        Self::new(component_type, CorrelationId::unassigned())
    }

    /// Creates tracking for a component reconstructed from the backend.
    ///
    /// # Panics
    ///
    /// Panics if `component_type` is empty.
    #[must_use]
    pub fn loaded(
        component_type: impl Into<Cow<'static, str>>,
        id: CorrelationId,
        surrogate_id: SurrogateId,
    ) -> Self {
        Self {
            surrogate_id,
            state: ComponentState::Unchanged,
            ..Self::new(component_type, id)
        }
    }

    /// Returns the component type.
    #[must_use]
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    /// Returns the correlation id.
    #[must_use]
    pub fn id(&self) -> &CorrelationId {
        &self.id
    }

    /// Returns the surrogate id (`-1` until allocated).
    #[must_use]
    pub fn surrogate_id(&self) -> SurrogateId {
        self.surrogate_id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> ComponentState {
        self.state
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Requests an insert transition.
    pub fn request_insert(&mut self) {
        self.state = self.state.after_insert();
    }

    /// Requests an update transition.
    ///
    /// # Errors
    ///
    /// Returns a precondition violation if the component is marked for deletion.
    pub fn request_update(&mut self) -> Result<()> {
        self.state = self.state.after_update()?;
        Ok(())
    }

    /// Requests a delete transition (`NEW` becomes `DISCARDED`, otherwise `REMOVED`).
    pub fn request_delete(&mut self) {
        self.state = self.state.after_delete();
    }

    /// Marks the component as matching the backend.
    pub fn set_unchanged(&mut self) {
        self.state = ComponentState::Unchanged;
    }

    /// Allocates this component's surrogate id.
    ///
    /// # Errors
    ///
    /// Returns a precondition violation if an id was already allocated, or a
    /// database component failure wrapping the allocator's error.
    pub fn allocate(&mut self, allocator: &dyn IdAllocator) -> Result<SurrogateId> {
        if self.surrogate_id.is_allocated() {
            return Err(Error::precondition(format!(
                "{} {} already has surrogate id {}",
                self.component_type, self.id, self.surrogate_id
            )));
        }
        let id = allocator.allocate(&self.component_type).map_err(|cause| {
            Error::database_component_caused_by(
                format!("allocating a surrogate id for {} {}", self.component_type, self.id),
                cause,
            )
        })?;
        tracing::debug!(
            component_type = %self.component_type,
            id = %self.id,
            surrogate_id = %id,
            "allocated surrogate id"
        );
        self.surrogate_id = id;
        Ok(id)
    }

    // =========================================================================
    // Design-time XML attributes
    // =========================================================================

    /// Writes `id`, `databaseId` and `componentState` onto `element`.
    pub fn write_attributes(&self, element: &mut Element) {
        element.set_attr(ID_ATTRIBUTE, &self.id);
        element.set_attr(DATABASE_ID_ATTRIBUTE, self.surrogate_id);
        element.set_attr(STATE_ATTRIBUTE, self.state);
    }

    /// Reads `id`, `databaseId` and `componentState` from `element`.
    ///
    /// A missing `componentState` means `UNCHANGED`.
    ///
    /// # Errors
    ///
    /// Returns an unknown node type error if `id` or `databaseId` is missing or
    /// malformed, or if `componentState` names no state.
    pub fn read_attributes(&mut self, element: &Element) -> Result<()> {
        let id = CorrelationId::new(element.required_attr(ID_ATTRIBUTE)?)
            .map_err(|_| Error::invalid_attribute(ID_ATTRIBUTE, ""))?;
        let surrogate_id = element.parse_attr::<SurrogateId>(DATABASE_ID_ATTRIBUTE)?;
        let state = element
            .parse_attr_opt::<ComponentState>(STATE_ATTRIBUTE)?
            .unwrap_or(ComponentState::Unchanged);

        self.id = id;
        self.surrogate_id = surrogate_id;
        self.state = state;
        Ok(())
    }
}
