//! Change-tracked database components, collections, and action documents for
//! designstore.
//!
//! This crate provides:
//! - [`Tracking`] - Identity and lifecycle state embedded in every component
//! - [`Serializable`] / [`Persistable`] - Capability traits entities implement
//! - [`DatabaseComponentCollection`] - Live members plus pending deletions
//! - [`ActionDocument`] - Append-only change-set produced by [`persist`]
//! - [`IdAllocator`] / [`ComponentLoader`] - Seams for the backend

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod allocator;
pub mod collection;
pub mod component;
pub mod config;
pub mod loader;
pub mod session;
pub mod tracking;
pub mod validation;


pub use action::{ActionDocument, ActionFragment, ActionSink};
pub use allocator::{IdAllocator, SequenceAllocator, SequenceError};
pub use collection::{DatabaseComponentCollection, MemberFactory};
pub use component::{Persistable, Serializable, persist_component};
pub use config::PersistConfig;
pub use loader::{ComponentLoader, MemoryLoader};
pub use session::{PersistSession, persist};
pub use tracking::Tracking;
pub use validation::{Validate, ValidationContext, ValidationIssue};
