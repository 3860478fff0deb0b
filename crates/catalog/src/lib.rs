//! `prodcat-catalog`: the concurrent product catalog.
//!
//! Owns the mapping from each product to its review history and keeps every
//! product's rating consistent with that history while many threads read and
//! write at once.

pub mod catalog;
pub mod query;
pub mod snapshot;

pub use catalog::Catalog;
pub use snapshot::{CatalogEntry, CatalogSnapshot};
