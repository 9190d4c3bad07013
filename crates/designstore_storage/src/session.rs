//! One persistence walk: the sink and allocator shared by every recursive call.

use designstore_foundation::{RelationContext, Result};

use crate::action::{ActionDocument, ActionFragment, ActionSink};
use crate::allocator::IdAllocator;
use crate::component::Persistable;
use crate::config::PersistConfig;

/// Shared state of a single depth-first persistence walk.
pub struct PersistSession<'a> {
    sink: &'a mut dyn ActionSink,
    allocator: &'a dyn IdAllocator,
    emitted: usize,
}

impl<'a> PersistSession<'a> {
    /// Creates a session writing into `sink` and allocating through `allocator`.
    pub fn new(sink: &'a mut dyn ActionSink, allocator: &'a dyn IdAllocator) -> Self {
        Self {
            sink,
            allocator,
            emitted: 0,
        }
    }

    /// Returns the id allocator.
    #[must_use]
    pub fn allocator(&self) -> &'a dyn IdAllocator {
        self.allocator
    }

    /// Appends a fragment to the sink.
    pub fn emit(&mut self, fragment: ActionFragment) {
        tracing::debug!(
            kind = %fragment.kind,
            component_type = %fragment.component_type,
            relation = %fragment.relation,
            "queued action"
        );
        self.emitted += 1;
        self.sink.push(fragment);
    }

    /// Returns how many fragments this session has emitted.
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

/// Persists a component tree into a fresh action document.
///
/// This is the top-level entry point: it starts the walk at an empty relation
/// context and returns every action the tree produced, in traversal order.
///
/// # Errors
///
/// Propagates the first failure of the walk; the document is discarded.
pub fn persist<C>(root: &mut C, allocator: &dyn IdAllocator, config: PersistConfig) -> Result<ActionDocument>
where
    C: Persistable + ?Sized,
{
    let mut document = ActionDocument::new(config);
    let mut session = PersistSession::new(&mut document, allocator);
    root.to_database_xml(&mut session, &RelationContext::new())?;
    let emitted = session.emitted();
    tracing::debug!(
        component_type = root.component_type(),
        actions = emitted,
        "persisted component tree"
    );
    Ok(document)
}
