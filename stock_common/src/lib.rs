//! Stock Common - shared types for the store stock checker
//!
//! Feed documents (store directory, inventory snapshot), the known-models
//! catalog and the error type used by every stock checker crate.

pub mod catalog;
pub mod error;
pub mod models;

pub use catalog::ModelCatalog;
pub use error::{ConfigError, Result, StockError};
pub use models::{InventorySnapshot, StockEvent, StoreDirectory, StoreRecord, StoresFeed};
