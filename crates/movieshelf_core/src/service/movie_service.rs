//! Movie use-case service.
//!
//! # Responsibility
//! - Provide the add/update/delete verbs, delegating to the store.
//! - Provide list/search/sort/statistics/random verbs by running collection
//!   operations over a fresh store listing.
//!
//! # Invariants
//! - Every call acts on the user of the supplied session only.
//! - Title-addressed update/delete report `NotFound` instead of failing.

use crate::collection::{self, CollectionStats, MovieFilter};
use crate::model::movie::{Movie, MovieCollection, MovieId, MovieUpdate, NewMovie};
use crate::model::user::Session;
use crate::repo::movie_repo::MovieRepository;
use crate::service::resolver::MovieResolver;
use crate::service::{MutationOutcome, ServiceError, ServiceResult};
use rand::Rng;

/// Session-scoped facade over a movie repository.
pub struct MovieService<R: MovieRepository> {
    repo: R,
}

impl<R: MovieRepository> MovieService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists the session user's movies ordered by id.
    pub fn list(&self, session: &Session) -> ServiceResult<MovieCollection> {
        Ok(self.repo.list_movies(session.user_id())?)
    }

    /// Adds a movie for the session user.
    pub fn add(&self, session: &Session, movie: &NewMovie) -> ServiceResult<MovieId> {
        Ok(self.repo.add_movie(session.user_id(), movie)?)
    }

    /// Looks `title` up through `resolver` and stores the resolved record.
    ///
    /// # Errors
    /// - [`ServiceError::MovieNotResolved`] when the lookup has no record.
    /// - [`ServiceError::Resolve`] when the lookup itself fails.
    pub fn add_resolved(
        &self,
        session: &Session,
        title: &str,
        resolver: &dyn MovieResolver,
    ) -> ServiceResult<Movie> {
        let resolved = resolver
            .resolve(title)?
            .ok_or_else(|| ServiceError::MovieNotResolved(title.trim().to_string()))?;
        let request = NewMovie::from(resolved);
        let id = self.repo.add_movie(session.user_id(), &request)?;

        self.repo
            .list_movies(session.user_id())?
            .get(id)
            .cloned()
            .ok_or(ServiceError::InconsistentState(
                "added movie not found in read-back",
            ))
    }

    /// Applies `update` to every movie of the session user titled `title`.
    pub fn update(
        &self,
        session: &Session,
        title: &str,
        update: &MovieUpdate,
    ) -> ServiceResult<MutationOutcome> {
        let changed = self.repo.update_movie(session.user_id(), title, update)?;
        Ok(MutationOutcome::from_count(changed))
    }

    /// Deletes every movie of the session user titled `title`.
    pub fn delete(&self, session: &Session, title: &str) -> ServiceResult<MutationOutcome> {
        let removed = self.repo.delete_movie(session.user_id(), title)?;
        Ok(MutationOutcome::from_count(removed))
    }

    /// Returns `None` when the session user has no movies.
    pub fn statistics(&self, session: &Session) -> ServiceResult<Option<CollectionStats>> {
        let movies = self.list(session)?;
        Ok(collection::statistics(movies.as_slice()))
    }

    pub fn search(&self, session: &Session, query: &str) -> ServiceResult<Vec<Movie>> {
        let movies = self.list(session)?;
        Ok(owned(collection::search(movies.as_slice(), query)))
    }

    pub fn sorted_by_rating(&self, session: &Session) -> ServiceResult<Vec<Movie>> {
        let movies = self.list(session)?;
        Ok(owned(collection::sort_by_rating(movies.as_slice())))
    }

    pub fn sorted_by_year(
        &self,
        session: &Session,
        newest_first: bool,
    ) -> ServiceResult<Vec<Movie>> {
        let movies = self.list(session)?;
        Ok(owned(collection::sort_by_year(movies.as_slice(), newest_first)))
    }

    pub fn filtered(
        &self,
        session: &Session,
        bounds: &MovieFilter,
    ) -> ServiceResult<Vec<Movie>> {
        let movies = self.list(session)?;
        Ok(owned(collection::filter(movies.as_slice(), bounds)))
    }

    /// Returns `None` when the session user has no movies.
    pub fn random_pick<G: Rng + ?Sized>(
        &self,
        session: &Session,
        rng: &mut G,
    ) -> ServiceResult<Option<Movie>> {
        let movies = self.list(session)?;
        Ok(collection::random_pick(movies.as_slice(), rng).cloned())
    }
}

fn owned(movies: Vec<&Movie>) -> Vec<Movie> {
    movies.into_iter().cloned().collect()
}
