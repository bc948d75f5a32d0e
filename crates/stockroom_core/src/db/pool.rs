//! Pooled connection source for SQLite.
//!
//! # Responsibility
//! - Build r2d2 pools over file or in-memory SQLite databases.
//! - Configure connection pragmas required by store behavior.
//! - Trigger schema migrations before handing out a usable pool.
//!
//! # Invariants
//! - Every pooled connection has `foreign_keys=ON` and a busy timeout.
//! - Returned pools point at a fully migrated database.
//! - In-memory pools are capped at one connection, so every caller
//!   observes the same database.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use r2d2::CustomizeConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Shared handle to the SQLite connection pool.
///
/// Cloning is cheap and every clone draws from the same pool.
pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

/// One connection borrowed from [`DbPool`]; returned to the pool on drop.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct ConnectionBootstrap;

impl CustomizeConnection<Connection, rusqlite::Error> for ConnectionBootstrap {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(())
    }
}

/// Opens a pooled SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Performs pool bootstrap and migration checks.
/// - Emits `pool_open` logging events with duration and status.
pub fn new_pool(path: impl AsRef<Path>) -> DbResult<DbPool> {
    let manager = SqliteConnectionManager::file(path);
    build_pool(manager, r2d2::Pool::builder(), "file")
}

/// Opens a pooled in-memory SQLite database and applies all pending
/// migrations.
///
/// The pool is limited to a single connection; a plain in-memory manager
/// would otherwise hand every checkout its own private database.
pub fn new_pool_in_memory() -> DbResult<DbPool> {
    let manager = SqliteConnectionManager::memory();
    build_pool(manager, r2d2::Pool::builder().max_size(1), "memory")
}

fn build_pool(
    manager: SqliteConnectionManager,
    builder: r2d2::Builder<SqliteConnectionManager>,
    mode: &str,
) -> DbResult<DbPool> {
    let started_at = Instant::now();
    info!("event=pool_open module=db status=start mode={mode}");

    let result = (|| -> DbResult<DbPool> {
        let pool = builder
            .connection_customizer(Box::new(ConnectionBootstrap))
            .build(manager)?;

        let mut conn = pool.get()?;
        apply_migrations(&mut conn)?;
        drop(conn);

        Ok(pool)
    })();

    match &result {
        Ok(_) => info!(
            "event=pool_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=pool_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }

    result
}
