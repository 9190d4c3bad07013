//! Loading related components from the backend.
//!
//! The query layer is not part of this crate. A [`ComponentLoader`] answers
//! "which persisted records of this type belong under this relation context"
//! with records in their design-time XML form; the caller's factory turns
//! each record into a typed component.

use std::collections::HashMap;

use designstore_foundation::{Element, RelationContext, Result};

/// Resolves a relation context plus a target type into persisted records.
pub trait ComponentLoader {
    /// Returns the records of `member_type` that belong to the leaf of `relation`.
    ///
    /// # Errors
    ///
    /// Backends wrap their query failures as database component failures.
    fn get_related_database_components(
        &self,
        relation: &RelationContext,
        member_type: &str,
        dataset_name: &str,
    ) -> Result<Vec<Element>>;
}

/// In-memory loader keyed by dataset name.
///
/// A record belongs to a context when its foreign-key attribute for the
/// context's leaf (`<type>_id`) equals the leaf's surrogate id. A root context
/// matches every record in the dataset.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    datasets: HashMap<String, Vec<Element>>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record to a dataset.
    pub fn insert(&mut self, dataset_name: impl Into<String>, record: Element) {
        self.datasets
            .entry(dataset_name.into())
            .or_default()
            .push(record);
    }

    /// Builder form of [`MemoryLoader::insert`].
    #[must_use]
    pub fn with_record(mut self, dataset_name: impl Into<String>, record: Element) -> Self {
        self.insert(dataset_name, record);
        self
    }

    /// Returns the number of records in a dataset.
    #[must_use]
    pub fn dataset_len(&self, dataset_name: &str) -> usize {
        self.datasets.get(dataset_name).map_or(0, Vec::len)
    }
}

impl ComponentLoader for MemoryLoader {
    fn get_related_database_components(
        &self,
        relation: &RelationContext,
        member_type: &str,
        dataset_name: &str,
    ) -> Result<Vec<Element>> {
        let Some(records) = self.datasets.get(dataset_name) else {
            return Ok(Vec::new());
        };
        let matching: Vec<Element> = match relation.leaf() {
            None => records.clone(),
            Some(parent) => {
                let key = parent.foreign_key();
                let id = parent.id.to_string();
                records
                    .iter()
                    .filter(|r| r.attr(&key) == Some(id.as_str()))
                    .cloned()
                    .collect()
            }
        };
        tracing::trace!(
            member_type,
            dataset_name,
            relation = %relation,
            records = matching.len(),
            "loaded related records"
        );
        Ok(matching)
    }
}
