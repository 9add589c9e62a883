//! Search, ordering and filtering over one user's movies.
//!
//! All functions borrow their input and preserve the relative order of
//! entries they do not reorder.

use crate::model::movie::Movie;

/// Returns movies whose title contains `query`, ignoring case, in input order.
///
/// An empty query matches every movie; whitespace is matched literally.
pub fn search<'a>(movies: &'a [Movie], query: &str) -> Vec<&'a Movie> {
    let needle = query.to_lowercase();
    movies
        .iter()
        .filter(|movie| movie.title.to_lowercase().contains(&needle))
        .collect()
}

/// Orders movies by rating, highest first. Equal ratings keep input order.
pub fn sort_by_rating(movies: &[Movie]) -> Vec<&Movie> {
    let mut sorted: Vec<&Movie> = movies.iter().collect();
    sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    sorted
}

/// Orders movies by release year, oldest first. Equal years keep input order.
pub fn sort_by_year(movies: &[Movie], newest_first: bool) -> Vec<&Movie> {
    let mut sorted: Vec<&Movie> = movies.iter().collect();
    if newest_first {
        sorted.sort_by(|a, b| b.year.cmp(&a.year));
    } else {
        sorted.sort_by_key(|movie| movie.year);
    }
    sorted
}

/// Optional bounds for [`filter`]. Unset bounds do not constrain.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovieFilter {
    pub min_rating: Option<f64>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        self.min_rating.map_or(true, |min| movie.rating >= min)
            && self.start_year.map_or(true, |start| movie.year >= start)
            && self.end_year.map_or(true, |end| movie.year <= end)
    }
}

/// Returns movies satisfying every bound of `filter`, in input order.
pub fn filter<'a>(movies: &'a [Movie], filter: &MovieFilter) -> Vec<&'a Movie> {
    movies.iter().filter(|movie| filter.matches(movie)).collect()
}
