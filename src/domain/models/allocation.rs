//! Allocation records and outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A code about to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAllocation {
    pub initials: String,
    pub employee_name: String,
}

/// A successfully committed code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub initials: String,
    /// Index into the strategy table that produced the code.
    pub strategy: usize,
    /// Store inserts consumed by the run, including the committing one.
    pub attempts: u32,
}

/// How an allocation run ended, short of a fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AllocationOutcome {
    Allocated(Allocation),
    /// Every strategy collided (or was not applicable) without a commit.
    Exhausted { attempts: u32 },
    /// The store kept failing transiently until the retry budget ran out.
    TransientFailure { attempts: u32 },
}

impl AllocationOutcome {
    pub fn initials(&self) -> Option<&str> {
        match self {
            Self::Allocated(allocation) => Some(&allocation.initials),
            _ => None,
        }
    }

    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Allocated(Allocation { attempts, .. })
            | Self::Exhausted { attempts }
            | Self::TransientFailure { attempts } => *attempts,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allocated(_) => "allocated",
            Self::Exhausted { .. } => "exhausted",
            Self::TransientFailure { .. } => "transient_failure",
        }
    }
}

/// A row read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialsRecord {
    pub id: i64,
    pub initials: String,
    pub employee_name: String,
    pub allocated_at: DateTime<Utc>,
}
