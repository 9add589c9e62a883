//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - User names are unique; registering an existing name returns its id.
//! - Removing a user removes that user's movies in the same transaction.

use crate::model::user::{normalize_user_name, User, UserId};
use crate::repo::{begin_immediate, ensure_catalog_ready, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;

/// Repository interface for user registration and lookup.
pub trait UserRepository {
    /// Registers `name` or resolves it when already present.
    fn create_user(&self, name: &str) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_user_by_name(&self, name: &str) -> RepoResult<Option<User>>;
    /// Returns every user ordered by id.
    fn list_users(&self) -> RepoResult<BTreeMap<UserId, String>>;
    /// Removes a user together with all of their movies.
    ///
    /// Returns `false` when no such user exists.
    fn delete_user(&self, id: UserId) -> RepoResult<bool>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, name: &str) -> RepoResult<UserId> {
        let name = normalize_user_name(name)?;

        let tx = begin_immediate(self.conn)?;
        let inserted = tx.execute("INSERT OR IGNORE INTO users (name) VALUES (?1);", [name])?;
        let id: UserId = tx.query_row("SELECT id FROM users WHERE name = ?1;", [name], |row| {
            row.get(0)
        })?;
        tx.commit()?;

        info!(
            "event=user_register module=repo status=ok user_id={} created={}",
            id,
            inserted == 1
        );
        Ok(id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name FROM users WHERE id = ?1;",
                [id],
                parse_user_row,
            )
            .optional()?)
    }

    fn find_user_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        let name = normalize_user_name(name)?;
        Ok(self
            .conn
            .query_row(
                "SELECT id, name FROM users WHERE name = ?1;",
                [name],
                parse_user_row,
            )
            .optional()?)
    }

    fn list_users(&self) -> RepoResult<BTreeMap<UserId, String>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM users ORDER BY id;")?;
        let mut rows = stmt.query([])?;
        let mut users = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let user = parse_user_row(row)?;
            users.insert(user.id, user.name);
        }
        Ok(users)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<bool> {
        let tx = begin_immediate(self.conn)?;
        let movies_removed = tx.execute("DELETE FROM movies WHERE user_id = ?1;", params![id])?;
        let removed = tx.execute("DELETE FROM users WHERE id = ?1;", params![id])?;
        tx.commit()?;

        if removed > 0 {
            info!(
                "event=user_delete module=repo status=ok user_id={} movies_removed={}",
                id, movies_removed
            );
        }
        Ok(removed > 0)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
