//! Store: repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define user and movie data access contracts.
//! - Isolate SQLite query details from service/collection code.
//! - Map storage-engine failures onto the catalog error taxonomy.
//!
//! # Invariants
//! - Every mutating call runs in one `BEGIN IMMEDIATE` transaction.
//! - Movie reads are always scoped to one user id.
//! - Lock contention surfaces as [`RepoError::Busy`] and is never retried here.

use crate::db::migrations::{latest_version, table_columns, table_exists};
use crate::db::{is_busy_error, DbError};
use crate::model::user::UserId;
use crate::model::ValidationError;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod movie_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Caller input rejected; nothing was written.
    Validation(ValidationError),
    /// Referenced user does not exist; nothing was written.
    UserNotFound(UserId),
    /// Another writer holds the catalog lock past the busy timeout. Retriable.
    Busy,
    /// Any other storage-engine fault.
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether the caller may retry the same call later.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Busy => write!(f, "catalog is locked by another writer; try again"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        if value.is_busy() {
            return Self::Busy;
        }
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if is_busy_error(&value) {
            return Self::Busy;
        }
        Self::Db(DbError::Sqlite(value))
    }
}

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("users", &["id", "name"]),
    (
        "movies",
        &[
            "id", "user_id", "title", "year", "rating", "poster", "notes", "imdb_id",
        ],
    ),
];

/// Rejects connections that did not go through [`crate::db::open_db`].
fn ensure_catalog_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 =
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        let present = table_columns(conn, table)?;
        for &column in columns {
            if !present.iter().any(|current| current == column) {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

/// Starts a write transaction that takes the reserved lock up front, so lock
/// contention is reported before any statement runs.
fn begin_immediate(conn: &Connection) -> RepoResult<Transaction<'_>> {
    Ok(Transaction::new_unchecked(
        conn,
        TransactionBehavior::Immediate,
    )?)
}
