//! Seam for the external catalog lookup.
//!
//! The core never performs network I/O; callers plug in a resolver (HTTP
//! client, fixture table, ...) and the service only consumes its output.

use crate::model::movie::ResolvedMovie;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maps a free-text title to structured movie metadata.
pub trait MovieResolver {
    /// Returns `Ok(None)` when the catalog has no record for `title`.
    fn resolve(&self, title: &str) -> Result<Option<ResolvedMovie>, ResolveError>;
}

/// Failure reported by a resolver implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    message: String,
}

impl ResolveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "catalog lookup failed: {}", self.message)
    }
}

impl Error for ResolveError {}
