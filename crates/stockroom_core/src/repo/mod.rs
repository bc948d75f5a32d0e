//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQL statement details from service orchestration.
//!
//! # Invariants
//! - Repository writes must run model validation before persistence.
//! - Every operation borrows one pooled connection and releases it on
//!   scope exit, success or failure.
//! - Repository APIs return semantic errors (`NotFound`, `MissingId`) in
//!   addition to DB transport errors.

use crate::db::DbError;
use crate::model::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod person_repo;
pub mod product_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Single error kind for all persistence-layer failures.
#[derive(Debug)]
pub enum StoreError {
    /// Model validation rejected a write.
    Validation(ValidationError),
    /// Statement preparation or execution failed.
    Db(DbError),
    /// A connection could not be acquired from the pool.
    Pool(r2d2::Error),
    /// No row matched the requested identifier.
    NotFound { entity: &'static str, id: i64 },
    /// A row-keyed operation was attempted on a value without an id.
    MissingId(&'static str),
    /// A persisted row could not be mapped back to a domain value.
    InvalidData(String),
    /// The backing database has not been migrated to the expected version.
    UninitializedDatabase {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Pool(err) => write!(f, "cannot acquire database connection: {err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::MissingId(entity) => write!(f, "{entity} id cannot be null"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedDatabase {
                expected_version,
                actual_version,
            } => write!(
                f,
                "database schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Pool(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(value: r2d2::Error) -> Self {
        Self::Pool(value)
    }
}

/// Rejects connections whose schema version differs from this binary's.
pub(crate) fn ensure_schema_version(conn: &Connection) -> StoreResult<()> {
    let expected = crate::db::migrations::latest_version();
    let actual = crate::db::migrations::current_user_version(conn)?;
    if actual != expected {
        return Err(StoreError::UninitializedDatabase {
            expected_version: expected,
            actual_version: actual,
        });
    }
    Ok(())
}

/// Rejects connections missing a required table or any of its columns.
pub(crate) fn ensure_required_table(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> StoreResult<()> {
    if !table_exists(conn, table)? {
        return Err(StoreError::MissingRequiredTable(table));
    }
    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(StoreError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
