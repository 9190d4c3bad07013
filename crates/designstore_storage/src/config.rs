//! Configuration for rendering action documents.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Controls the shape of the rendered action document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PersistConfig {
    /// Name of the container element.
    pub root_element: String,

    /// Name of each action element.
    pub action_element: String,

    /// Whether each action carries one `<type>_id` attribute per ancestor.
    pub emit_relation_keys: bool,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            root_element: "Actions".to_string(),
            action_element: "Action".to_string(),
            emit_relation_keys: true,
        }
    }
}

impl PersistConfig {
    /// Creates a configuration that renders bare actions (no relation keys).
    #[must_use]
    pub fn bare() -> Self {
        Self {
            emit_relation_keys: false,
            ..Self::default()
        }
    }

    /// Builder method to set the container element name.
    #[must_use]
    pub fn with_root_element(mut self, name: impl Into<String>) -> Self {
        self.root_element = name.into();
        self
    }

    /// Builder method to set the action element name.
    #[must_use]
    pub fn with_action_element(mut self, name: impl Into<String>) -> Self {
        self.action_element = name.into();
        self
    }

    /// Builder method to enable/disable relation key attributes.
    #[must_use]
    pub fn with_relation_keys(mut self, emit: bool) -> Self {
        self.emit_relation_keys = emit;
        self
    }
}
