//! Domain layer for the initials allocator.
//!
//! Holds the pure strategy table, the allocation outcome types and the store
//! port that adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{AllocationError, StoreError, StoreResult, StrategyError};
