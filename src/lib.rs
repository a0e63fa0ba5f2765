//! Initials - unique employee initials allocator
//!
//! Derives a short uppercase code from an employee's full name and records it
//! in a store that enforces uniqueness. Nine naming strategies are tried in a
//! fixed order; a collision moves on to the next strategy, a transient store
//! fault waits and retries.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): name parsing, strategy table, errors, store ports
//! - **Service Layer** (`services`): the allocation retry loop
//! - **Adapters** (`adapters`): SQLite and in-memory stores, HTTP API
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use initials::adapters::memory::InMemoryInitialsStore;
//! use initials::{AllocationConfig, AllocationService};
//!
//! # async fn run() -> Result<(), initials::AllocationError> {
//! let service = AllocationService::new(
//!     Arc::new(InMemoryInitialsStore::new()),
//!     AllocationConfig::default(),
//! );
//! let outcome = service.allocate("Anna Lisa Berg").await?;
//! assert_eq!(outcome.initials(), Some("ANBER"));
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    generate, AllocationConfig, AllocationOutcome, Candidate, Config, DatabaseConfig,
    LoggingConfig, NameParts, NewAllocation, ServerConfig, Strategy, TransientPolicy,
    STRATEGIES, STRATEGY_COUNT,
};
pub use domain::ports::{InitialsStore, StoreSession};
pub use domain::{AllocationError, StoreError, StoreResult, StrategyError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::AllocationService;
