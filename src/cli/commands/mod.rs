//! CLI command implementations.

pub mod allocate;
pub mod init;
pub mod list;
pub mod preview;
pub mod serve;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::sqlite::{initialize_database, PoolConfig, SqliteInitialsStore};
use crate::domain::models::Config;
use crate::services::AllocationService;

fn pool_config(config: &Config) -> PoolConfig {
    PoolConfig {
        max_connections: config.database.max_connections,
        busy_timeout: config.database.busy_timeout(),
        ..PoolConfig::default()
    }
}

/// Store for the configured database, creating and migrating it first.
async fn sqlite_store(config: &Config) -> Result<SqliteInitialsStore> {
    let pool = initialize_database(&config.database.url(), Some(pool_config(config)))
        .await
        .with_context(|| format!("Failed to open database {}", config.database.path))?;
    pool.close().await;

    SqliteInitialsStore::new(&config.database)
        .with_context(|| format!("Invalid database path {}", config.database.path))
}

/// Allocation service backed by the configured SQLite database.
async fn sqlite_service(config: &Config) -> Result<AllocationService<SqliteInitialsStore>> {
    let store = sqlite_store(config).await?;
    Ok(AllocationService::new(Arc::new(store), config.allocation.clone()))
}
