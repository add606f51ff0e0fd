//! Popularity Ranker - genre-filtered content recommendations
//!
//! ## Algorithm
//! 1. Validate every queried genre against the genre universe
//! 2. Keep movies carrying ALL queried genres (exact tag membership)
//! 3. Drop movies below the reliability threshold (default: 10 ratings)
//! 4. Score = avg_rating * ln(1 + rating_count)
//! 5. Stable sort by score descending, so ties keep catalog order
//! 6. Return the top `limit`

use crate::aggregator::popularity_score;
use crate::error::{NoResultsReason, RecommendError, Result};
use crate::genre_index::GenreIndex;
use crate::types::{RatedMovie, Recommendation, Strategy};
use tracing::{debug, instrument};

/// A conjunction of genre names, e.g. "Comedy+Romance"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreQuery {
    genres: Vec<String>,
}

impl GenreQuery {
    /// Parse user input where genres are joined with `+`.
    ///
    /// Whitespace around each name is ignored, as are empty parts.
    pub fn parse(input: &str) -> Result<Self> {
        Self::from_genres(input.split('+'))
    }

    pub fn from_genres<I, S>(genres: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed: Vec<String> = Vec::new();
        for genre in genres {
            let genre = genre.as_ref().trim();
            if !genre.is_empty() && !parsed.iter().any(|g| g == genre) {
                parsed.push(genre.to_string());
            }
        }

        if parsed.is_empty() {
            return Err(RecommendError::EmptyQuery);
        }
        Ok(Self { genres: parsed })
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(String::as_str)
    }

    /// Human readable form, e.g. "Comedy + Romance"
    pub fn display_name(&self) -> String {
        self.genres.join(" + ")
    }
}

/// Ranks movies of a genre combination by rating and popularity
#[derive(Debug, Clone)]
pub struct PopularityRanker {
    /// Minimum number of ratings for a movie to be ranked at all
    min_rating_count: u32,
}

impl PopularityRanker {
    pub fn new() -> Self {
        Self {
            min_rating_count: 10,
        }
    }

    /// Configure the reliability threshold (default: 10)
    pub fn with_min_rating_count(mut self, count: u32) -> Self {
        self.min_rating_count = count;
        self
    }

    pub fn min_rating_count(&self) -> u32 {
        self.min_rating_count
    }

    /// Rank `catalog` for `query` and return at most `limit` movies.
    ///
    /// `catalog` must be the stats-joined movie table in its original order.
    #[instrument(skip(self, catalog, genres), fields(query = %query.display_name()))]
    pub fn rank(
        &self,
        query: &GenreQuery,
        catalog: &[RatedMovie],
        genres: &GenreIndex,
        limit: usize,
    ) -> Result<Vec<Recommendation>> {
        let unknown = genres.unknown(query.iter());
        if !unknown.is_empty() {
            return Err(RecommendError::UnknownGenre { genres: unknown });
        }

        let matched: Vec<&RatedMovie> = catalog
            .iter()
            .filter(|rated| rated.movie.has_all_genres(query.iter()))
            .collect();
        if matched.is_empty() {
            return Err(RecommendError::NoResults {
                query: query.display_name(),
                reason: NoResultsReason::NoGenreMatch,
            });
        }

        let mut ranked: Vec<Recommendation> = matched
            .iter()
            .filter(|rated| rated.stats.rating_count >= self.min_rating_count)
            .map(|rated| {
                Recommendation::new(
                    rated.movie.id,
                    popularity_score(rated.stats.avg_rating, rated.stats.rating_count),
                    Strategy::Content,
                )
            })
            .collect();
        if ranked.is_empty() {
            return Err(RecommendError::NoResults {
                query: query.display_name(),
                reason: NoResultsReason::BelowReliabilityThreshold {
                    matched: matched.len(),
                    min_rating_count: self.min_rating_count,
                },
            });
        }

        // sort_by is stable: equal scores keep catalog order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(limit);

        debug!(
            "Ranked {} of {} matching movies",
            ranked.len(),
            matched.len()
        );
        Ok(ranked)
    }
}

impl Default for PopularityRanker {
    fn default() -> Self {
        Self::new()
    }
}
