//! Movie repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide user-scoped CRUD over the `movies` table.
//! - Resolve user-facing titles to surrogate ids before mutating.
//!
//! # Invariants
//! - Inserts require an existing owner; a missing owner writes nothing.
//! - Titles are not unique per user. Title-addressed updates and deletes apply
//!   to every matching row and report how many rows they touched.
//! - Zero matched rows is a normal outcome, not an error.
//! - Titles match after trimming both sides, so padded rows from older
//!   catalogs stay addressable. A blank title reaches blank rows only.

use crate::model::movie::{Movie, MovieCollection, MovieId, MovieUpdate, NewMovie};
use crate::model::user::UserId;
use crate::model::ValidationError;
use crate::repo::{begin_immediate, ensure_catalog_ready, RepoError, RepoResult};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const MOVIE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    year,
    rating,
    poster,
    notes,
    imdb_id
FROM movies";

/// Repository interface for user-scoped movie operations.
pub trait MovieRepository {
    fn add_movie(&self, user_id: UserId, movie: &NewMovie) -> RepoResult<MovieId>;
    /// Lists the user's movies ordered by id. Unknown users yield an empty list.
    fn list_movies(&self, user_id: UserId) -> RepoResult<MovieCollection>;
    /// Ids of the user's rows whose trimmed title equals `title`, ascending.
    fn find_movie_ids(&self, user_id: UserId, title: &str) -> RepoResult<Vec<MovieId>>;
    /// Applies `update` to every row of the user titled `title`.
    fn update_movie(
        &self,
        user_id: UserId,
        title: &str,
        update: &MovieUpdate,
    ) -> RepoResult<usize>;
    /// Deletes every row of the user titled `title`.
    fn delete_movie(&self, user_id: UserId, title: &str) -> RepoResult<usize>;
}

/// SQLite-backed movie repository.
pub struct SqliteMovieRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMovieRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MovieRepository for SqliteMovieRepository<'_> {
    fn add_movie(&self, user_id: UserId, movie: &NewMovie) -> RepoResult<MovieId> {
        movie.validate()?;

        let tx = begin_immediate(self.conn)?;
        if !user_exists(&tx, user_id)? {
            return Err(RepoError::UserNotFound(user_id));
        }

        tx.execute(
            "INSERT INTO movies (
                user_id,
                title,
                year,
                rating,
                poster,
                notes,
                imdb_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                user_id,
                movie.title.trim(),
                movie.year,
                movie.rating,
                movie.poster.as_deref(),
                movie.notes.as_deref(),
                movie.imdb_id.as_deref(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(
            "event=movie_add module=repo status=ok user_id={} movie_id={}",
            user_id, id
        );
        Ok(id)
    }

    fn list_movies(&self, user_id: UserId) -> RepoResult<MovieCollection> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MOVIE_SELECT_SQL} WHERE user_id = ?1 ORDER BY id;"))?;
        let mut rows = stmt.query([user_id])?;
        let mut movies = Vec::new();
        while let Some(row) = rows.next()? {
            movies.push(parse_movie_row(row)?);
        }
        Ok(MovieCollection::new(movies))
    }

    fn find_movie_ids(&self, user_id: UserId, title: &str) -> RepoResult<Vec<MovieId>> {
        select_ids_by_title(self.conn, user_id, title)
    }

    fn update_movie(
        &self,
        user_id: UserId,
        title: &str,
        update: &MovieUpdate,
    ) -> RepoResult<usize> {
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }

        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(rating) = update.rating {
            assignments.push("rating = ?");
            bind_values.push(Value::Real(rating));
        }
        if let Some(notes) = &update.notes {
            assignments.push("notes = ?");
            bind_values.push(notes.clone().map_or(Value::Null, Value::Text));
        }
        let sql = format!("UPDATE movies SET {} WHERE id = ?;", assignments.join(", "));

        let tx = begin_immediate(self.conn)?;
        let ids = select_ids_by_title(&tx, user_id, title)?;
        let mut changed = 0;
        for id in &ids {
            let mut values = bind_values.clone();
            values.push(Value::Integer(*id));
            changed += tx.execute(&sql, params_from_iter(values))?;
        }
        tx.commit()?;

        info!(
            "event=movie_update module=repo status=ok user_id={} matched={}",
            user_id, changed
        );
        Ok(changed)
    }

    fn delete_movie(&self, user_id: UserId, title: &str) -> RepoResult<usize> {
        let tx = begin_immediate(self.conn)?;
        let ids = select_ids_by_title(&tx, user_id, title)?;
        let mut removed = 0;
        for id in &ids {
            removed += tx.execute(
                "DELETE FROM movies WHERE id = ?1 AND user_id = ?2;",
                params![id, user_id],
            )?;
        }
        tx.commit()?;

        info!(
            "event=movie_delete module=repo status=ok user_id={} matched={}",
            user_id, removed
        );
        Ok(removed)
    }
}

fn select_ids_by_title(
    conn: &Connection,
    user_id: UserId,
    title: &str,
) -> RepoResult<Vec<MovieId>> {
    let mut stmt = conn.prepare(
        "SELECT id
         FROM movies
         WHERE user_id = ?1 AND trim(title) = ?2
         ORDER BY id;",
    )?;
    let ids = stmt
        .query_map(params![user_id, title.trim()], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<MovieId>>>()?;
    Ok(ids)
}

fn user_exists(conn: &Connection, user_id: UserId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_movie_row(row: &Row<'_>) -> RepoResult<Movie> {
    let title: String = row.get("title")?;
    if title.trim().is_empty() {
        let id: MovieId = row.get("id")?;
        return Err(RepoError::InvalidData(format!(
            "blank title in movies.title for id {id}"
        )));
    }

    Ok(Movie {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title,
        year: row.get("year")?,
        rating: row.get("rating")?,
        poster: row.get("poster")?,
        notes: row.get("notes")?,
        imdb_id: row.get("imdb_id")?,
    })
}
