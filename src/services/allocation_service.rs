//! Allocation orchestrator.
//!
//! Walks the strategy table in order, pairing each candidate with one insert
//! against the store. Collisions move to the next strategy, transient faults
//! pause and retry under their own budget, anything else ends the run.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, instrument, warn};

use crate::domain::errors::{AllocationError, StoreError, StoreResult};
use crate::domain::models::{
    generate, Allocation, AllocationConfig, AllocationOutcome, Candidate, NameParts,
    NewAllocation, TransientPolicy, STRATEGY_COUNT,
};
use crate::domain::ports::InitialsStore;

/// Allocates unique initials against an [`InitialsStore`].
pub struct AllocationService<S: InitialsStore + ?Sized> {
    store: Arc<S>,
    config: AllocationConfig,
}

impl<S: InitialsStore + ?Sized> Clone for AllocationService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

/// Counters for one run. The strategy cursor and the transient counter are
/// independent; `attempts` counts store inserts across both.
#[derive(Debug, Default)]
struct RunState {
    cursor: usize,
    attempts: u32,
    transient_faults: u32,
}

impl<S: InitialsStore + ?Sized> AllocationService<S> {
    pub fn new(store: Arc<S>, config: AllocationConfig) -> Self {
        Self { store, config }
    }

    pub const fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Allocate initials for `name`.
    ///
    /// The name is not validated: an empty or single-token name still runs and
    /// may commit a short (even empty) code.
    #[instrument(skip(self))]
    pub async fn allocate(&self, name: &str) -> Result<AllocationOutcome, AllocationError> {
        let parts = NameParts::parse(name);
        let mut run = RunState::default();

        while run.cursor < STRATEGY_COUNT && run.attempts < self.config.max_attempts {
            let initials = match generate(&parts, run.cursor)? {
                Candidate::Code(code) => code,
                Candidate::NotApplicable => {
                    debug!(strategy = run.cursor, "Strategy needs a middle name, skipping");
                    run.cursor += 1;
                    continue;
                }
            };

            run.attempts += 1;
            debug!(
                strategy = run.cursor,
                attempt = run.attempts,
                initials = %initials,
                "Trying candidate"
            );

            match self.try_commit(&initials, name).await {
                Ok(()) => {
                    info!(
                        initials = %initials,
                        strategy = run.cursor,
                        attempts = run.attempts,
                        "Allocated initials"
                    );
                    return Ok(AllocationOutcome::Allocated(Allocation {
                        initials,
                        strategy: run.cursor,
                        attempts: run.attempts,
                    }));
                }
                Err(StoreError::Duplicate(_)) => {
                    debug!(initials = %initials, strategy = run.cursor, "Initials taken");
                    run.cursor += 1;
                }
                Err(StoreError::Transient(reason)) => {
                    run.transient_faults += 1;
                    let next_cursor = match self.config.on_transient {
                        TransientPolicy::RetrySame => Some(run.cursor),
                        TransientPolicy::Advance => next_applicable(&parts, run.cursor + 1),
                    };

                    let next_cursor = match next_cursor {
                        Some(cursor)
                            if run.attempts < self.config.max_attempts
                                && run.transient_faults <= self.config.max_transient_retries =>
                        {
                            cursor
                        }
                        _ => {
                            warn!(
                                attempts = run.attempts,
                                transient_faults = run.transient_faults,
                                "Store still failing after retry budget: {}",
                                reason
                            );
                            return Ok(AllocationOutcome::TransientFailure {
                                attempts: run.attempts,
                            });
                        }
                    };

                    let delay = self.config.transient_delay();
                    warn!(
                        "Transient store fault on attempt {}/{}: {}. Retrying in {:?}",
                        run.attempts, self.config.max_attempts, reason, delay
                    );
                    sleep(delay).await;
                    run.cursor = next_cursor;
                }
                Err(StoreError::Fatal(reason)) => {
                    error!(attempt = run.attempts, "Store fault, abandoning allocation: {}", reason);
                    return Err(AllocationError::Store(reason));
                }
            }
        }

        // Transient retries spent the insert budget before every strategy was
        // offered; that is a store problem, not a shortage of codes.
        if run.transient_faults > 0 && next_applicable(&parts, run.cursor).is_some() {
            warn!(
                attempts = run.attempts,
                transient_faults = run.transient_faults,
                strategy = run.cursor,
                "Insert budget spent on transient faults before all strategies were tried"
            );
            return Ok(AllocationOutcome::TransientFailure {
                attempts: run.attempts,
            });
        }

        warn!(attempts = run.attempts, "No unique initials left for this name");
        Ok(AllocationOutcome::Exhausted {
            attempts: run.attempts,
        })
    }

    /// Allocate under a deadline.
    ///
    /// On expiry the in-flight attempt is dropped, which releases its session.
    pub async fn allocate_within(
        &self,
        name: &str,
        deadline: Duration,
    ) -> Result<AllocationOutcome, AllocationError> {
        timeout(deadline, self.allocate(name)).await.map_err(|_| {
            warn!(?deadline, "Allocation deadline exceeded");
            AllocationError::DeadlineExceeded(deadline)
        })?
    }

    /// Allocate, applying the configured deadline when one is set.
    pub async fn execute(&self, name: &str) -> Result<AllocationOutcome, AllocationError> {
        match self.config.deadline() {
            Some(deadline) => self.allocate_within(name, deadline).await,
            None => self.allocate(name).await,
        }
    }

    /// One attempt: open a session, insert, close. The session is closed on
    /// every path before the outcome is classified.
    async fn try_commit(&self, initials: &str, name: &str) -> StoreResult<()> {
        let mut session = self.store.open().await?;
        let result = session
            .insert(&NewAllocation {
                initials: initials.to_string(),
                employee_name: name.to_string(),
            })
            .await;
        session.close().await;
        result
    }
}

/// First strategy at or after `from` that yields a code for `parts`.
fn next_applicable(parts: &NameParts, from: usize) -> Option<usize> {
    (from..STRATEGY_COUNT).find(|&index| {
        matches!(generate(parts, index), Ok(Candidate::Code(_)))
    })
}
