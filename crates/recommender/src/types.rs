//! Result types shared by every strategy.

use data_loader::{Movie, MovieId, MovieStats};
use serde::Serialize;
use std::fmt;

/// Which strategy produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Strategy {
    /// Genre-filtered popularity ranking
    Content,
    /// User-similarity collaborative filtering
    Collaborative,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Content => write!(f, "Content-based"),
            Strategy::Collaborative => write!(f, "Collaborative"),
        }
    }
}

/// A scored movie produced by one strategy.
///
/// Scores are only comparable between recommendations of the same strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub score: f64,
    pub source: Strategy,
}

impl Recommendation {
    pub fn new(movie_id: MovieId, score: f64, source: Strategy) -> Self {
        Self {
            movie_id,
            score,
            source,
        }
    }
}

/// A movie joined with its rating statistics
#[derive(Debug, Clone, PartialEq)]
pub struct RatedMovie {
    pub movie: Movie,
    pub stats: MovieStats,
}

/// A recommendation resolved into everything a caller displays or exports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedMovie {
    pub rank: usize,
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    pub avg_rating: Option<f64>,
    pub rating_count: u32,
    pub score: f64,
    pub source: Strategy,
}
