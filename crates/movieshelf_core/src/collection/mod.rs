//! Collection operations: pure functions over one user's movies.
//!
//! # Responsibility
//! - Derive statistics, search results, orderings and random picks from a
//!   store listing without touching storage.
//!
//! # Invariants
//! - No function here performs I/O or mutates its input.
//! - Empty input is a normal case and never panics.

pub mod pick;
pub mod query;
pub mod stats;

pub use pick::random_pick;
pub use query::{filter, search, sort_by_rating, sort_by_year, MovieFilter};
pub use stats::{round2, statistics, CollectionStats};
