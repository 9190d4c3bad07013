//! Component state, identifiers, relation contexts, and the XML element model
//! for designstore.
//!
//! This crate provides:
//! - [`ComponentState`] - Persistence lifecycle and its transition table
//! - [`SurrogateId`] / [`CorrelationId`] - Backend and document-scoped ids
//! - [`RelationContext`] - Persistent ancestor key chain
//! - [`Element`] - XML element tree with a `quick-xml` text codec
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;
pub mod relation;
pub mod state;
pub mod xml;

pub use error::{BoxError, Error, ErrorContext, ErrorKind, Result};
pub use id::{CorrelationId, SurrogateId};
pub use relation::{RelationContext, RelationKey, dataset_name, foreign_key_attribute};
pub use state::{ActionKind, ComponentState};
pub use xml::Element;
