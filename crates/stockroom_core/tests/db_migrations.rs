use rusqlite::Connection;
use stockroom_core::db::migrations::latest_version;
use stockroom_core::db::{new_pool, new_pool_in_memory, DbError, DbPool};

#[test]
fn new_pool_in_memory_applies_all_migrations() {
    let pool = new_pool_in_memory().unwrap();

    assert_eq!(schema_version(&pool), latest_version());
    assert_table_exists(&pool, "products");
    assert_table_exists(&pool, "persons");
    assert_table_exists(&pool, "notes");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stockroom.db");

    let pool_first = new_pool(&path).unwrap();
    assert_eq!(schema_version(&pool_first), latest_version());
    drop(pool_first);

    let pool_second = new_pool(&path).unwrap();
    assert_eq!(schema_version(&pool_second), latest_version());
    assert_table_exists(&pool_second, "products");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = new_pool(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn pooled_connections_have_foreign_keys_enabled() {
    let pool = new_pool_in_memory().unwrap();

    let enabled: i64 = pool
        .get()
        .unwrap()
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

fn schema_version(pool: &DbPool) -> u32 {
    pool.get()
        .unwrap()
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(pool: &DbPool, table_name: &str) {
    let exists: i64 = pool
        .get()
        .unwrap()
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
