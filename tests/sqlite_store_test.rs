mod helpers;

use std::sync::Arc;
use std::time::Duration;

use initials::adapters::sqlite::{classify_error, SqliteInitialsStore};
use initials::{
    AllocationConfig, AllocationError, AllocationOutcome, AllocationService, InitialsStore,
    NewAllocation, StoreError,
};

use helpers::database::{setup_test_db, teardown_test_db};

fn allocation(initials: &str, name: &str) -> NewAllocation {
    NewAllocation {
        initials: initials.to_string(),
        employee_name: name.to_string(),
    }
}

async fn count_rows(pool: &sqlx::SqlitePool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employee_initials")
        .fetch_one(pool)
        .await
        .expect("failed to count rows");
    count
}

#[tokio::test]
async fn test_insert_then_duplicate() {
    let db = setup_test_db().await;
    let store = SqliteInitialsStore::new(&db.config).unwrap();

    let mut session = store.open().await.unwrap();
    session.insert(&allocation("ANBER", "Anna Lisa Berg")).await.unwrap();
    let err = session
        .insert(&allocation("ANBER", "Anders Bergman"))
        .await
        .unwrap_err();
    session.close().await;

    assert_eq!(err, StoreError::Duplicate("ANBER".to_string()));
    assert_eq!(count_rows(&db.pool).await, 1);
    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_locked_database_is_transient() {
    let db = setup_test_db().await;
    let store = SqliteInitialsStore::new(&db.config).unwrap();

    // Hold the write lock from another connection.
    let mut tx = db.pool.begin().await.unwrap();
    sqlx::query("INSERT INTO employee_initials (initials, employee_name) VALUES ('HOLD', 'Lock Holder')")
        .execute(&mut *tx)
        .await
        .unwrap();

    let mut session = store.open().await.unwrap();
    let err = session
        .insert(&allocation("ANBER", "Anna Lisa Berg"))
        .await
        .unwrap_err();
    assert!(err.is_transient(), "expected transient, got {err:?}");

    tx.rollback().await.unwrap();
    session.insert(&allocation("ANBER", "Anna Lisa Berg")).await.unwrap();
    session.close().await;

    assert_eq!(count_rows(&db.pool).await, 1);
    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_retry_after_lock_release_commits_a_single_row() {
    let db = setup_test_db().await;
    let store = SqliteInitialsStore::new(&db.config).unwrap();
    let config = AllocationConfig {
        transient_delay_ms: 300,
        ..AllocationConfig::default()
    };
    let service = AllocationService::new(Arc::new(store), config);

    let mut holder = db.pool.begin().await.unwrap();
    sqlx::query("INSERT INTO employee_initials (initials, employee_name) VALUES ('HOLD', 'Lock Holder')")
        .execute(&mut *holder)
        .await
        .unwrap();

    let run = tokio::spawn(async move { service.allocate("Anna Lisa Berg").await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    holder.rollback().await.unwrap();

    let outcome = run.await.unwrap().unwrap();
    assert_eq!(outcome.initials(), Some("ANBER"));
    assert_eq!(outcome.attempts(), 2);

    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT initials, employee_name FROM employee_initials ORDER BY id")
            .fetch_all(&db.pool)
            .await
            .unwrap();
    assert_eq!(rows, vec![("ANBER".to_string(), "Anna Lisa Berg".to_string())]);
    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_unique_violation_on_other_column_is_fatal() {
    let db = setup_test_db().await;
    sqlx::query("CREATE UNIQUE INDEX idx_employee_name ON employee_initials(employee_name)")
        .execute(&db.pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO employee_initials (initials, employee_name) VALUES ('ZZZ', 'Anna Lisa Berg')")
        .execute(&db.pool)
        .await
        .unwrap();

    let store = SqliteInitialsStore::new(&db.config).unwrap();
    let service = AllocationService::new(Arc::new(store), AllocationConfig::default());
    let result = service.allocate("Anna Lisa Berg").await;

    assert!(matches!(result, Err(AllocationError::Store(msg)) if msg.contains("employee_name")));
    assert_eq!(count_rows(&db.pool).await, 1);
    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_allocate_against_sqlite() {
    let db = setup_test_db().await;
    let store = Arc::new(SqliteInitialsStore::new(&db.config).unwrap());
    let service = AllocationService::new(store.clone(), AllocationConfig::default());

    let first = service.allocate("Anna Lisa Berg").await.unwrap();
    let second = service.allocate("Anna Lisa Berg").await.unwrap();

    assert_eq!(first.initials(), Some("ANBER"));
    assert_eq!(second.initials(), Some("ANNBE"));

    let records = store.list_recent(10).await.unwrap();
    let codes: Vec<_> = records.iter().map(|r| r.initials.as_str()).collect();
    assert_eq!(codes, vec!["ANNBE", "ANBER"]);
    assert!(records.iter().all(|r| r.employee_name == "Anna Lisa Berg"));
    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_exhaustion_against_sqlite() {
    let db = setup_test_db().await;
    let store = SqliteInitialsStore::new(&db.config).unwrap();
    let service = AllocationService::new(Arc::new(store), AllocationConfig::default());

    for _ in 0..6 {
        assert!(matches!(
            service.allocate("Eva Berg").await.unwrap(),
            AllocationOutcome::Allocated(_)
        ));
    }
    let outcome = service.allocate("Eva Berg").await.unwrap();

    assert_eq!(outcome, AllocationOutcome::Exhausted { attempts: 6 });
    assert_eq!(count_rows(&db.pool).await, 6);
    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_list_recent_respects_limit() {
    let db = setup_test_db().await;
    let store = SqliteInitialsStore::new(&db.config).unwrap();

    let mut session = store.open().await.unwrap();
    for code in ["AAA", "BBB", "CCC"] {
        session.insert(&allocation(code, "Test Person")).await.unwrap();
    }
    session.close().await;

    let records = store.list_recent(2).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].initials, "CCC");
    teardown_test_db(db).await;
}

#[test]
fn test_classify_pool_errors() {
    assert!(classify_error(sqlx::Error::PoolTimedOut).is_transient());
    assert!(classify_error(sqlx::Error::PoolClosed).is_transient());
    assert!(matches!(
        classify_error(sqlx::Error::RowNotFound),
        StoreError::Fatal(_)
    ));
}
