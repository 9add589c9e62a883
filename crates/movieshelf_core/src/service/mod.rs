//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and collection operations into the verbs
//!   a caller (CLI, test harness, service) invokes.
//! - Keep callers decoupled from storage details.
//!
//! # Invariants
//! - Every movie operation takes an explicit [`Session`](crate::Session);
//!   there is no process-wide current user.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod movie_service;
pub mod resolver;
pub mod user_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Session selection named a user that is not registered.
    UnknownUser(String),
    /// External lookup returned no record for the title.
    MovieNotResolved(String),
    /// External lookup failed.
    Resolve(resolver::ResolveError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl ServiceError {
    /// Returns whether the same call may succeed when retried.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Repo(err) => err.is_retriable(),
            _ => false,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownUser(name) => write!(f, "unknown user `{name}`"),
            Self::MovieNotResolved(title) => write!(f, "no catalog record found for `{title}`"),
            Self::Resolve(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent catalog state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Resolve(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<resolver::ResolveError> for ServiceError {
    fn from(value: resolver::ResolveError) -> Self {
        Self::Resolve(value)
    }
}

/// Result of a title-addressed update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Number of rows changed; always at least one.
    Applied(usize),
    NotFound,
}

impl MutationOutcome {
    fn from_count(count: usize) -> Self {
        if count == 0 {
            Self::NotFound
        } else {
            Self::Applied(count)
        }
    }
}
