//! Action fragments and the sinks that collect them.
//!
//! A persistence walk pushes one [`ActionFragment`] per changed component into
//! an [`ActionSink`]. Fragments are never nested: each one carries the
//! relation context it was emitted under instead.

use designstore_foundation::{ActionKind, Element, RelationContext, Result};

use crate::config::PersistConfig;

/// Attribute holding the action kind on each action element.
pub const TYPE_ATTRIBUTE: &str = "type";

/// One pending change of one component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionFragment {
    /// What the backend should do.
    pub kind: ActionKind,
    /// Component type of the changed component.
    pub component_type: String,
    /// Ancestor chain the component was emitted under.
    pub relation: RelationContext,
    /// The component's design-time serialization.
    pub payload: Element,
}

impl ActionFragment {
    /// Creates a fragment.
    #[must_use]
    pub fn new(
        kind: ActionKind,
        component_type: impl Into<String>,
        relation: RelationContext,
        payload: Element,
    ) -> Self {
        Self {
            kind,
            component_type: component_type.into(),
            relation,
            payload,
        }
    }

    /// Renders this fragment as an action element.
    #[must_use]
    pub fn to_element(&self, config: &PersistConfig) -> Element {
        let mut action = Element::new(config.action_element.as_str())
            .with_attr(TYPE_ATTRIBUTE, self.kind);
        if config.emit_relation_keys {
            for (attribute, id) in self.relation.foreign_keys() {
                action.set_attr(attribute, id);
            }
        }
        action.with_child(self.payload.clone())
    }
}

/// Append-only collector of action fragments.
///
/// Fragments must be kept in the order they were pushed.
pub trait ActionSink {
    /// Appends a fragment.
    fn push(&mut self, fragment: ActionFragment);
}

impl ActionSink for Vec<ActionFragment> {
    fn push(&mut self, fragment: ActionFragment) {
        Vec::push(self, fragment);
    }
}

/// The change-set document produced by a persistence walk.
#[derive(Clone, Debug, Default)]
pub struct ActionDocument {
    config: PersistConfig,
    fragments: Vec<ActionFragment>,
}

impl ActionDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new(config: PersistConfig) -> Self {
        Self {
            config,
            fragments: Vec::new(),
        }
    }

    /// Returns the rendering configuration.
    #[must_use]
    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    /// Returns the fragments in emission order.
    #[must_use]
    pub fn fragments(&self) -> &[ActionFragment] {
        &self.fragments
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Counts the actions of one kind.
    #[must_use]
    pub fn count(&self, kind: ActionKind) -> usize {
        self.fragments.iter().filter(|f| f.kind == kind).count()
    }

    /// Returns the fragments of one kind.
    pub fn of_kind(&self, kind: ActionKind) -> impl Iterator<Item = &ActionFragment> {
        self.fragments.iter().filter(move |f| f.kind == kind)
    }

    /// Renders the container element with one action element per fragment.
    #[must_use]
    pub fn to_element(&self) -> Element {
        self.fragments.iter().fold(
            Element::new(self.config.root_element.as_str()),
            |root, fragment| root.with_child(fragment.to_element(&self.config)),
        )
    }

    /// Renders the document as XML text.
    ///
    /// # Errors
    ///
    /// Returns an XML error if the writer fails.
    pub fn to_xml_string(&self) -> Result<String> {
        self.to_element().to_xml_string()
    }

    /// Consumes the document, returning its fragments.
    #[must_use]
    pub fn into_fragments(self) -> Vec<ActionFragment> {
        self.fragments
    }
}

impl ActionSink for ActionDocument {
    fn push(&mut self, fragment: ActionFragment) {
        self.fragments.push(fragment);
    }
}
