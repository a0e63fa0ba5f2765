use initials::adapters::sqlite::initialize_database;
use initials::DatabaseConfig;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A migrated SQLite database in its own temp directory.
///
/// Store sessions open fresh connections, so an in-memory database would be
/// a different database per session. Keep the `TempDir` alive for the test.
pub struct TestDatabase {
    pub dir: TempDir,
    pub config: DatabaseConfig,
    pub pool: SqlitePool,
}

pub async fn setup_test_db() -> TestDatabase {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = DatabaseConfig {
        path: dir.path().join("initials.db").to_string_lossy().into_owned(),
        busy_timeout_ms: 100,
        connect_timeout_ms: 2_000,
        ..DatabaseConfig::default()
    };

    let pool = initialize_database(&config.url(), None)
        .await
        .expect("failed to initialize test database");

    TestDatabase { dir, config, pool }
}

pub async fn teardown_test_db(db: TestDatabase) {
    db.pool.close().await;
}
