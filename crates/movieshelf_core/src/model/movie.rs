//! Movie records, write requests and the renderer-facing title view.
//!
//! # Invariants
//! - `Movie::id` is unique across the whole catalog.
//! - `Movie::user_id` references the owning user.
//! - `rating` is stored as supplied; range checks belong to callers.

use super::user::UserId;
use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Store-assigned movie id.
pub type MovieId = i64;

/// One persisted movie row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub user_id: UserId,
    pub title: String,
    /// Release year, usually four digits.
    pub year: i32,
    pub rating: f64,
    /// Poster URL. `None` means no poster.
    pub poster: Option<String>,
    /// Free-text personal notes.
    pub notes: Option<String>,
    /// Identifier in the external movie catalog.
    pub imdb_id: Option<String>,
}

impl Movie {
    /// Projects the attributes keyed by title in [`MovieCollection::title_view`].
    pub fn details(&self) -> MovieDetails {
        MovieDetails {
            year: self.year,
            rating: self.rating,
            poster: self.poster.clone(),
            notes: self.notes.clone(),
            imdb_id: self.imdb_id.clone(),
        }
    }
}

/// Per-title attributes consumed by the static site renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub year: i32,
    pub rating: f64,
    pub poster: Option<String>,
    pub notes: Option<String>,
    pub imdb_id: Option<String>,
}

/// Insert request for one movie.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: Option<String>,
    pub notes: Option<String>,
    pub imdb_id: Option<String>,
}

impl NewMovie {
    /// Creates a request with all optional attributes unset.
    pub fn new(title: impl Into<String>, year: i32, rating: f64) -> Self {
        Self {
            title: title.into(),
            year,
            rating,
            poster: None,
            notes: None,
            imdb_id: None,
        }
    }

    /// Rejects a blank title. The stored title is trimmed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Structured record returned by an external catalog lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMovie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: Option<String>,
    pub imdb_id: Option<String>,
}

impl From<ResolvedMovie> for NewMovie {
    fn from(value: ResolvedMovie) -> Self {
        Self {
            title: value.title,
            year: value.year,
            rating: value.rating,
            poster: value.poster,
            notes: None,
            imdb_id: value.imdb_id,
        }
    }
}

/// Field changes applied by an update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieUpdate {
    pub rating: Option<f64>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
}

impl MovieUpdate {
    pub fn rating(rating: f64) -> Self {
        Self {
            rating: Some(rating),
            ..Self::default()
        }
    }

    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(Some(notes.into())),
            ..Self::default()
        }
    }

    pub fn clear_notes() -> Self {
        Self {
            notes: Some(None),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.notes.is_none()
    }
}

/// One user's movies, keyed by surrogate id in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MovieCollection {
    movies: Vec<Movie>,
}

impl MovieCollection {
    /// Builds a collection; rows are ordered by id.
    pub fn new(mut movies: Vec<Movie>) -> Self {
        movies.sort_by_key(|movie| movie.id);
        Self { movies }
    }

    pub fn as_slice(&self) -> &[Movie] {
        &self.movies
    }

    pub fn into_vec(self) -> Vec<Movie> {
        self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.movies
            .binary_search_by_key(&id, |movie| movie.id)
            .ok()
            .map(|index| &self.movies[index])
    }

    /// Title-keyed view consumed by the site renderer.
    ///
    /// Rows sharing a title collapse to one entry; the most recently added
    /// row (highest id) wins.
    pub fn title_view(&self) -> BTreeMap<String, MovieDetails> {
        self.movies
            .iter()
            .map(|movie| (movie.title.clone(), movie.details()))
            .collect()
    }
}
