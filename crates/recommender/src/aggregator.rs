//! Rating Aggregator
//!
//! Reduces raw ratings into one `MovieStats` per rated movie and joins
//! those stats back onto the movie catalog.

use crate::types::RatedMovie;
use data_loader::{Movie, MovieId, MovieStats, Rating};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Popularity score: average rating dampened by log of the rating count.
///
/// `avg_rating * ln(1 + rating_count)` grows strictly with both inputs.
pub fn popularity_score(avg_rating: f64, rating_count: u32) -> f64 {
    avg_rating * (rating_count as f64).ln_1p()
}

/// Round to 3 decimal places, the precision stats are reported with
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Compute statistics for every movie with at least one rating.
///
/// Output is ordered by movie id. Movies without ratings are absent,
/// not zero-filled.
#[instrument(skip(ratings), fields(ratings = ratings.len()))]
pub fn aggregate_movie_stats(ratings: &[Rating]) -> Vec<MovieStats> {
    // movie_id -> (sum, count)
    let mut totals: BTreeMap<MovieId, (f64, u32)> = BTreeMap::new();
    for rating in ratings {
        let entry = totals.entry(rating.movie_id).or_insert((0.0, 0));
        entry.0 += rating.rating as f64;
        entry.1 += 1;
    }

    let stats: Vec<MovieStats> = totals
        .into_iter()
        .map(|(movie_id, (sum, count))| {
            let avg_rating = round3(sum / count as f64);
            MovieStats {
                movie_id,
                rating_count: count,
                avg_rating,
                popularity_score: popularity_score(avg_rating, count),
            }
        })
        .collect();

    debug!("Aggregated stats for {} movies", stats.len());
    stats
}

/// Inner join of the catalog with its stats, in catalog order.
///
/// Movies without stats are dropped.
pub fn join_with_movies(movies: &[Movie], stats: &[MovieStats]) -> Vec<RatedMovie> {
    let by_id: HashMap<MovieId, &MovieStats> = stats.iter().map(|s| (s.movie_id, s)).collect();

    movies
        .iter()
        .filter_map(|movie| {
            by_id.get(&movie.id).map(|&stats| RatedMovie {
                movie: movie.clone(),
                stats: *stats,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings() -> Vec<Rating> {
        vec![
            Rating::new(1, 10, 4.0),
            Rating::new(2, 10, 3.0),
            Rating::new(3, 10, 3.5),
            Rating::new(1, 20, 5.0),
            Rating::new(1, 30, 2.5),
            Rating::new(2, 30, 4.0),
        ]
    }

    #[test]
    fn test_counts_and_means() {
        let stats = aggregate_movie_stats(&ratings());

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].movie_id, 10);
        assert_eq!(stats[0].rating_count, 3);
        assert!((stats[0].avg_rating - 3.5).abs() < 1e-9);
        assert_eq!(stats[1].rating_count, 1);
        assert!((stats[2].avg_rating - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_mean_rounded_to_three_places() {
        let stats = aggregate_movie_stats(&[
            Rating::new(1, 1, 4.0),
            Rating::new(2, 1, 4.0),
            Rating::new(3, 1, 3.5),
        ]);
        // 11.5 / 3 = 3.8333...
        assert_eq!(stats[0].avg_rating, 3.833);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_movie_stats(&[]).is_empty());
    }

    #[test]
    fn test_score_uses_log1p() {
        let stats = aggregate_movie_stats(&[Rating::new(1, 1, 4.0)]);
        assert!((stats[0].popularity_score - 4.0 * 2f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_score_monotonic() {
        assert!(popularity_score(4.0, 12) > popularity_score(3.5, 12));
        assert!(popularity_score(4.0, 13) > popularity_score(4.0, 12));
    }

    #[test]
    fn test_join_is_inner_and_ordered() {
        let movies = vec![
            Movie::new(30, "C", "Drama"),
            Movie::new(99, "Unrated", "Drama"),
            Movie::new(10, "A", "Comedy"),
        ];
        let joined = join_with_movies(&movies, &aggregate_movie_stats(&ratings()));

        let ids: Vec<MovieId> = joined.iter().map(|m| m.movie.id).collect();
        assert_eq!(ids, vec![30, 10]);
        assert_eq!(joined[1].stats.rating_count, 3);
    }
}
