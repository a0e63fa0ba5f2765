use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use initials::{InitialsStore, NewAllocation, StoreError, StoreResult, StoreSession};

/// A store that replays a scripted list of insert results and records every
/// call, falling back to `fallback` once the script runs out.
#[derive(Clone)]
pub struct ScriptedStore {
    script: Arc<Mutex<VecDeque<StoreResult<()>>>>,
    fallback: StoreResult<()>,
    inserts: Arc<Mutex<Vec<String>>>,
    opened: Arc<Mutex<u32>>,
    closed: Arc<Mutex<u32>>,
}

impl ScriptedStore {
    pub fn new(script: Vec<StoreResult<()>>, fallback: StoreResult<()>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            fallback,
            inserts: Arc::new(Mutex::new(Vec::new())),
            opened: Arc::new(Mutex::new(0)),
            closed: Arc::new(Mutex::new(0)),
        }
    }

    /// Every insert fails with the same error.
    pub fn always(err: StoreError) -> Self {
        Self::new(Vec::new(), Err(err))
    }

    pub fn inserts(&self) -> Vec<String> {
        self.inserts.lock().unwrap().clone()
    }

    pub fn opened(&self) -> u32 {
        *self.opened.lock().unwrap()
    }

    pub fn closed(&self) -> u32 {
        *self.closed.lock().unwrap()
    }
}

pub fn transient() -> StoreError {
    StoreError::Transient("connection timed out".to_string())
}

pub fn duplicate() -> StoreError {
    StoreError::Duplicate("taken".to_string())
}

#[async_trait]
impl InitialsStore for ScriptedStore {
    async fn open(&self) -> StoreResult<Box<dyn StoreSession>> {
        *self.opened.lock().unwrap() += 1;
        Ok(Box::new(ScriptedSession {
            store: self.clone(),
        }))
    }
}

struct ScriptedSession {
    store: ScriptedStore,
}

#[async_trait]
impl StoreSession for ScriptedSession {
    async fn insert(&mut self, allocation: &NewAllocation) -> StoreResult<()> {
        self.store
            .inserts
            .lock()
            .unwrap()
            .push(allocation.initials.clone());
        let next = self.store.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.store.fallback.clone())
    }

    async fn close(self: Box<Self>) {
        *self.store.closed.lock().unwrap() += 1;
    }
}
