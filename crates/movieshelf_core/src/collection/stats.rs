//! Rating statistics over one user's movies.
//!
//! # Invariants
//! - Empty input yields `None`, never a panic or NaN.
//! - Best/worst ties resolve to the first movie in title order, then by
//!   lowest id, so results do not depend on input order.

use crate::model::movie::Movie;
use serde::Serialize;
use std::cmp::Ordering;

/// Summary of a non-empty collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    pub count: usize,
    /// Arithmetic mean, unrounded.
    pub mean: f64,
    pub median: f64,
    pub best: Movie,
    pub worst: Movie,
}

/// Computes mean, median, best and worst ratings.
pub fn statistics(movies: &[Movie]) -> Option<CollectionStats> {
    if movies.is_empty() {
        return None;
    }

    let mut by_title: Vec<&Movie> = movies.iter().collect();
    by_title.sort_by(|a, b| title_order(a, b));

    let mut best = by_title[0];
    let mut worst = by_title[0];
    for &movie in &by_title[1..] {
        // Strict comparison keeps the earlier movie on ties.
        if movie.rating > best.rating {
            best = movie;
        }
        if movie.rating < worst.rating {
            worst = movie;
        }
    }

    let ratings: Vec<f64> = movies.iter().map(|movie| movie.rating).collect();
    Some(CollectionStats {
        count: movies.len(),
        mean: mean(&ratings),
        median: median(&ratings),
        best: best.clone(),
        worst: worst.clone(),
    })
}

/// Rounds a rating figure to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(ratings: &[f64]) -> f64 {
    ratings.iter().sum::<f64>() / ratings.len() as f64
}

fn median(ratings: &[f64]) -> f64 {
    let mut sorted = ratings.to_vec();
    sorted.sort_by(f64::total_cmp);
    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[middle - 1] + sorted[middle]) / 2.0
    } else {
        sorted[middle]
    }
}

fn title_order(a: &Movie, b: &Movie) -> Ordering {
    a.title.cmp(&b.title).then(a.id.cmp(&b.id))
}
