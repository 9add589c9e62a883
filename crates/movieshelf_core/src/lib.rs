//! Core catalog logic for Movieshelf.
//! This crate is the single source of truth for catalog invariants: user
//! scoping, referential integrity and schema evolution.

pub mod collection;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use collection::{CollectionStats, MovieFilter};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::movie::{
    Movie, MovieCollection, MovieDetails, MovieId, MovieUpdate, NewMovie, ResolvedMovie,
};
pub use model::user::{Session, User, UserId};
pub use model::ValidationError;
pub use repo::movie_repo::{MovieRepository, SqliteMovieRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::movie_service::MovieService;
pub use service::resolver::{MovieResolver, ResolveError};
pub use service::user_service::UserService;
pub use service::{MutationOutcome, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
