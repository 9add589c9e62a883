//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Add optional `movies` columns missing from catalogs written by older
//!   layouts (`poster`, `notes`, `imdb_id`).
//! - Apply pending work atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Column healing is additive only; existing rows keep their values and
//!   healed columns read back as `NULL`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_movies_user_title_index.sql"),
    },
];

/// Columns every `movies` table must already carry; they cannot be healed.
const REQUIRED_MOVIE_COLUMNS: &[&str] = &["id", "user_id", "title", "year", "rating"];

/// Nullable columns introduced after the first catalog layout.
const OPTIONAL_MOVIE_COLUMNS: &[(&str, &str)] =
    &[("poster", "TEXT"), ("notes", "TEXT"), ("imdb_id", "TEXT")];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations and heals optional columns.
///
/// Calling this on an already-current catalog is a no-op.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let unlocked_version = current_user_version(conn)?;
    let latest = latest_version();

    if unlocked_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: unlocked_version,
            latest_supported: latest,
        });
    }

    if unlocked_version == latest && missing_optional_columns(conn)?.is_empty() {
        return Ok(());
    }

    migrate_locked(conn, latest)
}

/// Runs healing and pending migrations under one IMMEDIATE transaction.
///
/// The version is re-read after the lock is taken; another connection may
/// have migrated since the unlocked read.
fn migrate_locked(conn: &mut Connection, latest: u32) -> DbResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current_version = current_user_version(&tx)?;
    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if table_exists(&tx, "movies")? {
        ensure_required_movie_columns(&tx)?;
        for (column, sql_type) in missing_optional_columns(&tx)? {
            tx.execute_batch(&format!("ALTER TABLE movies ADD COLUMN {column} {sql_type};"))?;
            info!("event=schema_heal module=db status=ok table=movies column={column}");
        }
    }

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        info!(
            "event=schema_migrate module=db status=ok version={}",
            migration.version
        );
    }
    tx.commit()?;

    Ok(())
}

/// Returns whether `table` exists in the connected catalog.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
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

/// Returns the column names of `table` in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get(1)?);
    }
    Ok(columns)
}

fn ensure_required_movie_columns(conn: &Connection) -> DbResult<()> {
    let columns = table_columns(conn, "movies")?;
    for &column in REQUIRED_MOVIE_COLUMNS {
        if !columns.iter().any(|current| current == column) {
            return Err(DbError::IncompatibleSchema {
                table: "movies",
                column,
            });
        }
    }
    Ok(())
}

fn missing_optional_columns(
    conn: &Connection,
) -> DbResult<Vec<(&'static str, &'static str)>> {
    if !table_exists(conn, "movies")? {
        return Ok(Vec::new());
    }

    let columns = table_columns(conn, "movies")?;
    Ok(OPTIONAL_MOVIE_COLUMNS
        .iter()
        .copied()
        .filter(|&(name, _)| !columns.iter().any(|current| current == name))
        .collect())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, migrate_locked, table_exists};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn locked_pass_trusts_version_read_under_the_lock() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
            .unwrap();

        migrate_locked(&mut conn, latest_version()).unwrap();

        assert!(!table_exists(&conn, "users").unwrap());
        assert!(!table_exists(&conn, "movies").unwrap());
    }

    #[test]
    fn locked_pass_rejects_newer_version_found_under_the_lock() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();

        let err = migrate_locked(&mut conn, latest_version()).unwrap_err();
        assert!(matches!(
            err,
            DbError::UnsupportedSchemaVersion { db_version: 999, .. }
        ));
    }

    #[test]
    fn locked_pass_applies_only_versions_above_current() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate_locked(&mut conn, latest_version()).unwrap();

        let version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, latest_version());
        assert!(table_exists(&conn, "movies").unwrap());
    }
}
