//! SQLite implementation of the InitialsStore.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tokio::time::timeout;
use tracing::debug;

use super::connection::{connect_options, ConnectionError};
use super::{parse_datetime, DatabaseError};
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::{DatabaseConfig, InitialsRecord, NewAllocation};
use crate::domain::ports::{InitialsStore, StoreSession};

/// Qualified name SQLite reports in `UNIQUE constraint failed: ...` messages.
const INITIALS_COLUMN: &str = "employee_initials.initials";

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Opens a brand-new connection for every session; connections are never
/// pooled across allocation attempts.
pub struct SqliteInitialsStore {
    options: SqliteConnectOptions,
    op_timeout: Duration,
}

impl SqliteInitialsStore {
    pub fn new(config: &DatabaseConfig) -> Result<Self, ConnectionError> {
        Ok(Self {
            options: connect_options(&config.url(), config.busy_timeout())?,
            op_timeout: config.connect_timeout(),
        })
    }

    /// Most recently allocated initials first.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<InitialsRecord>, DatabaseError> {
        let mut conn = self.options.connect().await?;
        let rows: Vec<InitialsRow> = sqlx::query_as(
            "SELECT id, initials, employee_name, allocated_at FROM employee_initials
             ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[async_trait]
impl InitialsStore for SqliteInitialsStore {
    async fn open(&self) -> StoreResult<Box<dyn StoreSession>> {
        let conn = timeout(self.op_timeout, self.options.connect())
            .await
            .map_err(|_| {
                StoreError::Transient(format!("connect timed out after {:?}", self.op_timeout))
            })?
            .map_err(classify_error)?;

        Ok(Box::new(SqliteSession {
            conn,
            op_timeout: self.op_timeout,
        }))
    }
}

struct SqliteSession {
    conn: SqliteConnection,
    op_timeout: Duration,
}

impl SqliteSession {
    async fn insert_in_transaction(&mut self, allocation: &NewAllocation) -> Result<(), sqlx::Error> {
        // IMMEDIATE takes the write lock up front, so contention fails here
        // before any row exists.
        sqlx::query("BEGIN IMMEDIATE").execute(&mut self.conn).await?;
        sqlx::query("INSERT INTO employee_initials (initials, employee_name) VALUES (?, ?)")
            .bind(allocation.initials.as_str())
            .bind(allocation.employee_name.as_str())
            .execute(&mut self.conn)
            .await?;
        sqlx::query("COMMIT").execute(&mut self.conn).await?;
        Ok(())
    }

    async fn rollback(&mut self) {
        if let Err(e) = sqlx::query("ROLLBACK").execute(&mut self.conn).await {
            debug!("Nothing to roll back: {}", e);
        }
    }
}

#[async_trait]
impl StoreSession for SqliteSession {
    /// Insert inside its own `BEGIN IMMEDIATE` transaction, rolled back on
    /// every failure, so a transient fault never leaves a committed row.
    ///
    /// The timeout cannot cancel a statement already handed to the SQLite
    /// worker thread. If it fires while `COMMIT` is running, the row may still
    /// commit after the attempt was reported transient. Config validation keeps
    /// `connect_timeout_ms` above `busy_timeout_ms` so lock waits end first.
    async fn insert(&mut self, allocation: &NewAllocation) -> StoreResult<()> {
        let result = timeout(self.op_timeout, self.insert_in_transaction(allocation)).await;
        match result {
            Err(_) => {
                let _ = timeout(self.op_timeout, self.rollback()).await;
                Err(StoreError::Transient(format!(
                    "insert timed out after {:?}",
                    self.op_timeout
                )))
            }
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                self.rollback().await;
                match classify_error(err) {
                    StoreError::Duplicate(_) => {
                        Err(StoreError::Duplicate(allocation.initials.clone()))
                    }
                    other => Err(other),
                }
            }
        }
    }

    async fn close(self: Box<Self>) {
        if let Err(e) = self.conn.close().await {
            debug!("Error closing store connection: {}", e);
        }
    }
}

/// Map a sqlx error onto the store's closed error kinds.
///
/// Only a unique violation on the initials column is a collision; a unique
/// violation on any other column is fatal.
pub fn classify_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) => {
            if db.is_unique_violation() && db.message().contains(INITIALS_COLUMN) {
                StoreError::Duplicate(db.message().to_string())
            } else if db
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .is_some_and(is_transient_code)
            {
                StoreError::Transient(err.to_string())
            } else {
                StoreError::Fatal(err.to_string())
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Transient(err.to_string()),
        _ => StoreError::Fatal(err.to_string()),
    }
}

// Extended result codes carry the primary code in the low byte.
const fn is_transient_code(code: i32) -> bool {
    matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)
}

#[derive(sqlx::FromRow)]
struct InitialsRow {
    id: i64,
    initials: String,
    employee_name: String,
    allocated_at: String,
}

impl TryFrom<InitialsRow> for InitialsRecord {
    type Error = DatabaseError;

    fn try_from(row: InitialsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            initials: row.initials,
            employee_name: row.employee_name,
            allocated_at: parse_datetime(&row.allocated_at)?,
        })
    }
}
