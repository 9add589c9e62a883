//! Random movie selection.

use crate::model::movie::Movie;
use rand::seq::SliceRandom;
use rand::Rng;

/// Picks one movie uniformly at random. Returns `None` for an empty slice.
pub fn random_pick<'a, R: Rng + ?Sized>(movies: &'a [Movie], rng: &mut R) -> Option<&'a Movie> {
    movies.choose(rng)
}
