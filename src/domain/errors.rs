//! Domain errors for the initials allocator.

use std::time::Duration;

use thiserror::Error;

/// Raised when the enumerator is asked for a strategy outside the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("No strategy at index {0}; valid indices are 0..{max}", max = crate::domain::models::STRATEGY_COUNT)]
    InvalidIndex(usize),
}

/// Closed classification of a failed store operation.
///
/// Adapters translate vendor error codes into one of these kinds; the
/// orchestrator never inspects anything below this enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The candidate is already allocated (uniqueness constraint on the code).
    #[error("Initials already allocated: {0}")]
    Duplicate(String),

    /// Connectivity, timeout or lock contention expected to clear on retry.
    #[error("Transient store fault: {0}")]
    Transient(String),

    /// Anything else. Never retried.
    #[error("Store fault: {0}")]
    Fatal(String),
}

impl StoreError {
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that end an allocation run without an [`AllocationOutcome`].
///
/// Collisions, exhaustion and exhausted transient retries are outcomes, not
/// errors; see [`crate::domain::models::AllocationOutcome`].
///
/// [`AllocationOutcome`]: crate::domain::models::AllocationOutcome
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("Unclassified store fault: {0}")]
    Store(String),

    #[error("Strategy contract violated: {0}")]
    InvalidStrategy(#[from] StrategyError),

    #[error("Allocation abandoned after deadline of {0:?}")]
    DeadlineExceeded(Duration),
}
