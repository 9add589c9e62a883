//! Catalog domain model.
//!
//! # Responsibility
//! - Define the records shared by the store, collection operations and the
//!   renderer-facing view.
//! - Own input validation that must hold before any row is written.
//!
//! # Invariants
//! - Users and movies are identified by store-assigned numeric ids.
//! - Names and titles are never blank.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod movie;
pub mod user;

/// Caller input rejected before reaching storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyUserName,
    EmptyTitle,
    /// Update request carries no field to change.
    EmptyUpdate,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUserName => write!(f, "user name must not be blank"),
            Self::EmptyTitle => write!(f, "movie title must not be blank"),
            Self::EmptyUpdate => write!(f, "movie update must change at least one field"),
        }
    }
}

impl Error for ValidationError {}
