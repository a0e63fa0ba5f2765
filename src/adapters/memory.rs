//! In-process initials store.
//!
//! Enforces uniqueness with a shared set. Useful for previews, tests and
//! embedding the allocator where durability is not needed.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::NewAllocation;
use crate::domain::ports::{InitialsStore, StoreSession};

#[derive(Debug, Clone, Default)]
pub struct InMemoryInitialsStore {
    codes: Arc<Mutex<HashSet<String>>>,
}

impl InMemoryInitialsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `codes` already allocated.
    pub fn with_codes<I, C>(codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            codes: Arc::new(Mutex::new(codes.into_iter().map(Into::into).collect())),
        }
    }

    pub fn contains(&self, initials: &str) -> bool {
        self.codes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(initials)
    }

    pub fn len(&self) -> usize {
        self.codes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl InitialsStore for InMemoryInitialsStore {
    async fn open(&self) -> StoreResult<Box<dyn StoreSession>> {
        Ok(Box::new(InMemorySession {
            codes: Arc::clone(&self.codes),
        }))
    }
}

struct InMemorySession {
    codes: Arc<Mutex<HashSet<String>>>,
}

#[async_trait]
impl StoreSession for InMemorySession {
    async fn insert(&mut self, allocation: &NewAllocation) -> StoreResult<()> {
        let mut codes = self.codes.lock().unwrap_or_else(PoisonError::into_inner);
        if codes.insert(allocation.initials.clone()) {
            Ok(())
        } else {
            Err(StoreError::Duplicate(allocation.initials.clone()))
        }
    }

    async fn close(self: Box<Self>) {}
}
