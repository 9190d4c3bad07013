//! designstore - change-tracked design-time object store
//!
//! This crate re-exports all layers of the designstore system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: designstore_storage    — Components, collections, loader, allocator, action documents
//! Layer 0: designstore_foundation — Core types (ComponentState, ids, RelationContext, Element, Error)
//! ```
//!
//! # Example
//!
//! ```
//! use designstore::foundation::{ActionKind, CorrelationId, Element, Result};
//! use designstore::storage::{
//!     DatabaseComponentCollection, PersistConfig, Persistable, SequenceAllocator,
//!     Serializable, Tracking, persist,
//! };
//!
//! struct Role {
//!     tracking: Tracking,
//! }
//!
//! impl Serializable for Role {
//!     fn element_name(&self) -> &str {
//!         "Role"
//!     }
//!
//!     fn to_xml(&self) -> Element {
//!         let mut el = Element::new("Role");
//!         self.tracking.write_attributes(&mut el);
//!         el
//!     }
//!
//!     fn from_xml(&mut self, element: &Element) -> Result<()> {
//!         element.expect_name("Role")?;
//!         self.tracking.read_attributes(element)
//!     }
//! }
//!
//! impl Persistable for Role {
//!     fn tracking(&self) -> &Tracking {
//!         &self.tracking
//!     }
//!
//!     fn tracking_mut(&mut self) -> &mut Tracking {
//!         &mut self.tracking
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let blank = || Role { tracking: Tracking::detached("Role") };
//! let mut roles = DatabaseComponentCollection::new(CorrelationId::new("roles")?, "Role", blank);
//! roles.add(Role { tracking: Tracking::new("Role", CorrelationId::new("editor")?) })?;
//!
//! let alloc = SequenceAllocator::new();
//! let doc = persist(&mut roles, &alloc, PersistConfig::default())?;
//! assert_eq!(doc.count(ActionKind::Insert), 1);
//! # Ok(())
//! # }
//! ```

pub use designstore_foundation as foundation;
pub use designstore_storage as storage;
