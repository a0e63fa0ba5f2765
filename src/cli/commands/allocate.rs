//! Implementation of the `initials allocate` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use thiserror::Error;

use super::sqlite_service;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AllocationOutcome, Config};

#[derive(Args, Debug)]
pub struct AllocateArgs {
    /// Full name of the employee, e.g. "Anna Lisa Berg"
    pub name: String,
}

/// Allocation runs that ended without a code. Each maps to its own exit code.
#[derive(Debug, Error)]
pub enum AllocateFailure {
    #[error("Unable to generate unique initials for '{name}' after {attempts} attempts")]
    Exhausted { name: String, attempts: u32 },

    #[error("Database kept timing out after {attempts} attempts, try again")]
    StoreUnavailable { attempts: u32 },
}

impl AllocateFailure {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Exhausted { .. } => 3,
            Self::StoreUnavailable { .. } => 4,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AllocateOutput {
    pub success: bool,
    pub employee_name: String,
    pub employee_initials: String,
    pub strategy: usize,
    pub attempts: u32,
}

impl CommandOutput for AllocateOutput {
    fn to_human(&self) -> String {
        format!(
            "{} {} -> {}",
            console::style("Allocated").green().bold(),
            self.employee_name,
            console::style(&self.employee_initials).bold()
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: AllocateArgs, config: &Config, json_mode: bool) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        anyhow::bail!("Employee name is required");
    }

    let service = sqlite_service(config).await?;
    let outcome = service
        .execute(name)
        .await
        .context("Allocation failed")?;

    match outcome {
        AllocationOutcome::Allocated(allocation) => {
            output(
                &AllocateOutput {
                    success: true,
                    employee_name: name.to_string(),
                    employee_initials: allocation.initials,
                    strategy: allocation.strategy,
                    attempts: allocation.attempts,
                },
                json_mode,
            );
            Ok(())
        }
        AllocationOutcome::Exhausted { attempts } => Err(AllocateFailure::Exhausted {
            name: name.to_string(),
            attempts,
        }
        .into()),
        AllocationOutcome::TransientFailure { attempts } => {
            Err(AllocateFailure::StoreUnavailable { attempts }.into())
        }
    }
}
