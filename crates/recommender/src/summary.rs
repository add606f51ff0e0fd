//! Dataset summary statistics.
//!
//! Everything a report about the loaded dataset needs, computed once.
//! Rendering is left to the caller.

use data_loader::{Movie, MovieId, MovieStats, NO_GENRES_LISTED, Rating, UserId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Minimum rating count for the "highest rated" list
pub const TOP_RATED_MIN_COUNT: u32 = 50;
const TOP_RATED_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBucket {
    pub value: f32,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRatedMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub avg_rating: f64,
    pub rating_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_movies: usize,
    pub total_ratings: usize,
    pub unique_users: usize,
    pub rated_movies: usize,
    pub avg_rating: f64,
    /// One bucket per distinct rating value, ascending
    pub rating_distribution: Vec<RatingBucket>,
    /// Movies per genre, most common first; ties alphabetical
    pub genre_counts: Vec<(String, usize)>,
    /// Mean number of ratings per user
    pub ratings_per_user: f64,
    pub top_rated: Vec<TopRatedMovie>,
}

impl DatasetSummary {
    pub fn compute(movies: &[Movie], ratings: &[Rating], stats: &[MovieStats]) -> Self {
        let unique_users: HashSet<UserId> = ratings.iter().map(|r| r.user_id).collect();
        let rated_movies: HashSet<MovieId> = ratings.iter().map(|r| r.movie_id).collect();

        let avg_rating = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().map(|r| r.rating as f64).sum::<f64>() / ratings.len() as f64
        };

        // Keyed by half-star steps
        let mut buckets: BTreeMap<u32, usize> = BTreeMap::new();
        for rating in ratings {
            *buckets.entry((rating.rating * 2.0).round() as u32).or_insert(0) += 1;
        }
        let rating_distribution = buckets
            .into_iter()
            .map(|(half_stars, count)| RatingBucket {
                value: half_stars as f32 / 2.0,
                count,
                percent: count as f64 * 100.0 / ratings.len() as f64,
            })
            .collect();

        let mut genre_counts: HashMap<&str, usize> = HashMap::new();
        for movie in movies {
            for genre in movie.genres.iter().filter(|g| g.as_str() != NO_GENRES_LISTED) {
                *genre_counts.entry(genre.as_str()).or_insert(0) += 1;
            }
        }
        let mut genre_counts: Vec<(String, usize)> = genre_counts
            .into_iter()
            .map(|(genre, count)| (genre.to_string(), count))
            .collect();
        genre_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let ratings_per_user = if unique_users.is_empty() {
            0.0
        } else {
            ratings.len() as f64 / unique_users.len() as f64
        };

        Self {
            total_movies: movies.len(),
            total_ratings: ratings.len(),
            unique_users: unique_users.len(),
            rated_movies: rated_movies.len(),
            avg_rating,
            rating_distribution,
            genre_counts,
            ratings_per_user,
            top_rated: top_rated(movies, stats),
        }
    }
}

fn top_rated(movies: &[Movie], stats: &[MovieStats]) -> Vec<TopRatedMovie> {
    let titles: HashMap<MovieId, &str> = movies.iter().map(|m| (m.id, m.title.as_str())).collect();

    let mut eligible: Vec<&MovieStats> = stats
        .iter()
        .filter(|s| s.rating_count >= TOP_RATED_MIN_COUNT)
        .collect();
    eligible.sort_by(|a, b| b.avg_rating.total_cmp(&a.avg_rating));

    eligible
        .into_iter()
        .filter_map(|s| {
            titles.get(&s.movie_id).map(|title| TopRatedMovie {
                movie_id: s.movie_id,
                title: title.to_string(),
                avg_rating: s.avg_rating,
                rating_count: s.rating_count,
            })
        })
        .take(TOP_RATED_LIMIT)
        .collect()
}
