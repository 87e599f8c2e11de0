//! Core types and traits for the car advisor
//!
//! This crate provides foundational types used across all other crates:
//! - Catalog entry and vehicle spec types
//! - Typed catalog query model (filter, ordering, limit)
//! - Conversation turn types
//! - Traits for pluggable backends (catalog store, session store)
//! - Error types

pub mod catalog;
pub mod conversation;
pub mod error;
pub mod query;
pub mod traits;

pub use catalog::{CatalogEntry, VehicleSpecs};
pub use conversation::{Turn, TurnRole};
pub use error::{Error, Result};
pub use query::{CatalogFilter, CatalogOrder, CatalogQuery};
pub use traits::{CatalogStore, SessionStore};
