//! Infrastructure layer: configuration, text records, snapshots and reports.
//!
//! Everything that touches the filesystem lives here; the catalog itself stays
//! in memory.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod loader;
pub mod persistence;
pub mod records;
pub mod report;

pub use config::CatalogConfig;
pub use error::InfraError;
pub use lifecycle::{CatalogRuntime, bootstrap, shutdown};
pub use loader::{load_directory, write_directory};
pub use persistence::{dump_snapshot, restore_snapshot};
pub use report::{product_listing, write_product_report};
