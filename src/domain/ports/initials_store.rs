//! Initials store port.

use async_trait::async_trait;

use crate::domain::errors::StoreResult;
use crate::domain::models::NewAllocation;

/// A backing store with a uniqueness constraint on the initials column.
///
/// Every allocation attempt opens its own session; nothing is reused between
/// attempts, so a connection broken by one fault cannot poison the retry.
#[async_trait]
pub trait InitialsStore: Send + Sync {
    /// Open a fresh session. Failures are classified like insert failures.
    async fn open(&self) -> StoreResult<Box<dyn StoreSession>>;
}

/// One scoped connection to the store.
///
/// Dropping a session must release its connection, so an abandoned attempt
/// leaks nothing; [`StoreSession::close`] is the orderly path.
#[async_trait]
pub trait StoreSession: Send {
    /// Insert `allocation`.
    ///
    /// Returns [`StoreError::Duplicate`] when the initials are taken,
    /// [`StoreError::Transient`] for faults worth retrying and
    /// [`StoreError::Fatal`] for everything else.
    ///
    /// [`StoreError::Duplicate`]: crate::domain::errors::StoreError::Duplicate
    /// [`StoreError::Transient`]: crate::domain::errors::StoreError::Transient
    /// [`StoreError::Fatal`]: crate::domain::errors::StoreError::Fatal
    async fn insert(&mut self, allocation: &NewAllocation) -> StoreResult<()>;

    /// Release the underlying connection.
    async fn close(self: Box<Self>);
}
