//! Collaborative Recommender - user-similarity collaborative filtering
//!
//! "Users most like you rated these movies highly"
//!
//! ## Algorithm
//! 1. Take the k users most similar to the target (cosine, self excluded)
//! 2. Candidates are movies any of them rated >= 4.0 that the target
//!    has not rated
//! 3. Score = mean over contributing neighbours of
//!    (neighbour similarity * neighbour rating)
//! 4. Return the top n by score
//!
//! The score is a mean, not a sum: the number of supporting neighbours
//! does not by itself raise a movie's score.

use crate::error::{RecommendError, Result};
use crate::similarity::UserSimilarityMatrix;
use crate::types::{Recommendation, Strategy};
use data_loader::{MovieId, Rating, UserId};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument};

/// Recommends movies from the highly rated picks of similar users
#[derive(Debug, Clone)]
pub struct CollaborativeRecommender {
    /// Number of most similar users to draw candidates from
    neighbors: usize,

    /// Minimum neighbour rating for a movie to become a candidate
    high_rating_threshold: f32,
}

impl CollaborativeRecommender {
    pub fn new() -> Self {
        Self {
            neighbors: 5,
            high_rating_threshold: 4.0,
        }
    }

    /// Configure how many neighbours are consulted (default: 5)
    pub fn with_neighbors(mut self, k: usize) -> Self {
        self.neighbors = k;
        self
    }

    /// Configure the high rating threshold (default: 4.0)
    pub fn with_high_rating_threshold(mut self, threshold: f32) -> Self {
        self.high_rating_threshold = threshold;
        self
    }

    /// Build a fresh similarity matrix and recommend up to `n` movies.
    ///
    /// An empty result is a success: the neighbours had nothing to offer.
    pub fn recommend(&self, user_id: UserId, ratings: &[Rating], n: usize) -> Result<Vec<Recommendation>> {
        let matrix = UserSimilarityMatrix::build(ratings);
        self.recommend_with_matrix(user_id, ratings, &matrix, n)
    }

    /// Same as [`recommend`](Self::recommend) with a prebuilt matrix.
    ///
    /// `matrix` must have been built from `ratings`.
    #[instrument(skip(self, ratings, matrix))]
    pub fn recommend_with_matrix(
        &self,
        user_id: UserId,
        ratings: &[Rating],
        matrix: &UserSimilarityMatrix,
        n: usize,
    ) -> Result<Vec<Recommendation>> {
        let neighbors = matrix
            .most_similar(user_id, self.neighbors)
            .ok_or(RecommendError::UnknownUser(user_id))?;
        debug!("Found {} neighbours", neighbors.len());

        let neighbor_similarity: HashMap<UserId, f64> = neighbors.into_iter().collect();
        let already_rated: HashSet<MovieId> = ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.movie_id)
            .collect();

        // movie_id -> (sum of similarity * rating, contributing neighbours)
        let mut contributions: BTreeMap<MovieId, (f64, u32)> = BTreeMap::new();
        for rating in ratings {
            let Some(&similarity) = neighbor_similarity.get(&rating.user_id) else {
                continue;
            };
            if rating.rating < self.high_rating_threshold || already_rated.contains(&rating.movie_id) {
                continue;
            }
            let entry = contributions.entry(rating.movie_id).or_insert((0.0, 0));
            entry.0 += similarity * rating.rating as f64;
            entry.1 += 1;
        }

        let mut recommendations: Vec<Recommendation> = contributions
            .into_iter()
            .map(|(movie_id, (sum, count))| {
                Recommendation::new(movie_id, sum / count as f64, Strategy::Collaborative)
            })
            .collect();

        // Stable: equal scores stay in ascending movie id order
        recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
        recommendations.truncate(n);

        debug!("Generated {} collaborative recommendations", recommendations.len());
        Ok(recommendations)
    }
}

impl Default for CollaborativeRecommender {
    fn default() -> Self {
        Self::new()
    }
}
