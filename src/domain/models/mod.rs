pub mod allocation;
pub mod config;
pub mod name;
pub mod strategy;

pub use allocation::{Allocation, AllocationOutcome, InitialsRecord, NewAllocation};
pub use config::{
    AllocationConfig, Config, DatabaseConfig, LogFormat, LoggingConfig, RotationPolicy,
    ServerConfig, TransientPolicy,
};
pub use name::NameParts;
pub use strategy::{candidates, generate, Candidate, Strategy, STRATEGIES, STRATEGY_COUNT};
