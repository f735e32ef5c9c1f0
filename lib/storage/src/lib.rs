//! # looq-storage
//!
//! Snapshot persistence for the product catalog. The whole catalog is
//! written as one bincode file, replaced atomically on every save.

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::{Result, StorageError};
pub use snapshot::{CatalogSnapshot, ProductRecord, SNAPSHOT_VERSION};
pub use store::{distance_mismatch, CatalogStore, DEFAULT_SAVE_INTERVAL, SNAPSHOT_FILENAME};
