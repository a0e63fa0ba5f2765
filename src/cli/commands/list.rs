//! Implementation of the `initials list` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::sqlite_store;
use crate::cli::output::{output, table_with_header, truncate, CommandOutput};
use crate::domain::models::{Config, InitialsRecord};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of records to show
    #[arg(long, short, default_value_t = 50)]
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub records: Vec<InitialsRecord>,
}

impl CommandOutput for ListOutput {
    fn to_human(&self) -> String {
        if self.records.is_empty() {
            return "No initials allocated yet.".to_string();
        }

        let mut table = table_with_header(&["Initials", "Employee", "Allocated"]);
        for record in &self.records {
            table.add_row(vec![
                record.initials.clone(),
                truncate(&record.employee_name, 40),
                record.allocated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]);
        }
        table.to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ListArgs, config: &Config, json_mode: bool) -> Result<()> {
    let store = sqlite_store(config).await?;
    let records = store
        .list_recent(args.limit)
        .await
        .context("Failed to list allocated initials")?;

    output(&ListOutput { records }, json_mode);
    Ok(())
}
