//! Port trait definitions (Hexagonal Architecture)
//!
//! - InitialsStore: opens one scoped session per allocation attempt
//! - StoreSession: inserts a candidate under the store's uniqueness constraint

pub mod initials_store;

pub use initials_store::{InitialsStore, StoreSession};
