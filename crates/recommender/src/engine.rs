//! # Recommendation Engine
//!
//! Wires the strategies to a loaded `DataIndex`:
//! 1. Aggregate movie stats, join them with the catalog, build the genre index (once)
//! 2. Serve genre, collaborative and hybrid requests
//! 3. Resolve recommendations into display rows
//!
//! Derived data is computed when the engine is created and never
//! mutated afterwards. The similarity matrix is memoized by the content
//! of the rating table.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use data_loader::{DataIndex, MovieId, MovieStats, UserId};
use tracing::{info, instrument, warn};

use crate::aggregator::{aggregate_movie_stats, join_with_movies};
use crate::collaborative::CollaborativeRecommender;
use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};
use crate::evaluation::{self, AccuracyReport};
use crate::genre_index::GenreIndex;
use crate::hybrid::combine;
use crate::popularity::{GenreQuery, PopularityRanker};
use crate::similarity::{SimilarityCache, UserSimilarityMatrix};
use crate::summary::DatasetSummary;
use crate::types::{RatedMovie, Recommendation, RecommendedMovie};

/// Entry point for every recommendation request
pub struct RecommendationEngine {
    data_index: Arc<DataIndex>,
    config: RecommenderConfig,
    stats: Vec<MovieStats>,
    stats_by_movie: HashMap<MovieId, MovieStats>,
    catalog: Vec<RatedMovie>,
    genres: GenreIndex,
    popularity: PopularityRanker,
    collaborative: CollaborativeRecommender,
    similarity_cache: SimilarityCache,
}

impl RecommendationEngine {
    /// Create an engine and precompute stats, catalog and genre index
    pub fn new(data_index: Arc<DataIndex>, config: RecommenderConfig) -> Self {
        let start = Instant::now();

        let stats = aggregate_movie_stats(data_index.ratings());
        let stats_by_movie = stats.iter().map(|s| (s.movie_id, *s)).collect();
        let catalog = join_with_movies(data_index.movies(), &stats);
        let genres = GenreIndex::from_movies(data_index.movies());

        let popularity = PopularityRanker::new().with_min_rating_count(config.min_rating_count);
        let collaborative = CollaborativeRecommender::new()
            .with_neighbors(config.neighbors)
            .with_high_rating_threshold(config.high_rating_threshold);

        info!(
            "Engine ready: {} rated movies, {} genres ({:.2?})",
            catalog.len(),
            genres.len(),
            start.elapsed()
        );

        Self {
            data_index,
            config,
            stats,
            stats_by_movie,
            catalog,
            genres,
            popularity,
            collaborative,
            similarity_cache: SimilarityCache::new(),
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn data_index(&self) -> &DataIndex {
        &self.data_index
    }

    pub fn genres(&self) -> &GenreIndex {
        &self.genres
    }

    pub fn stats(&self) -> &[MovieStats] {
        &self.stats
    }

    /// Stats-joined catalog in movie table order
    pub fn catalog(&self) -> &[RatedMovie] {
        &self.catalog
    }

    /// Popularity ranking for a genre combination
    pub fn by_genre(&self, query: &GenreQuery, limit: usize) -> Result<Vec<Recommendation>> {
        self.popularity.rank(query, &self.catalog, &self.genres, limit)
    }

    /// Collaborative recommendations for `user_id`
    #[instrument(skip(self))]
    pub fn collaborative(&mut self, user_id: UserId, n: usize) -> Result<Vec<Recommendation>> {
        let ratings = self.data_index.ratings();
        let matrix = self.similarity_cache.get_or_build(ratings);
        self.collaborative.recommend_with_matrix(user_id, ratings, &matrix, n)
    }

    /// Popularity and collaborative results interleaved into `n` slots.
    ///
    /// A source that finds nothing for this request, because the genres
    /// have no reliable movies or the user has no ratings, contributes an
    /// empty list. Malformed queries still fail.
    #[instrument(skip(self, query), fields(query = %query.display_name()))]
    pub fn hybrid(&mut self, user_id: UserId, query: &GenreQuery, n: usize) -> Result<Vec<Recommendation>> {
        let popularity = match self.by_genre(query, n.saturating_mul(2)) {
            Ok(recs) => recs,
            Err(RecommendError::NoResults { query, reason }) => {
                warn!("No content-based results for {}: {}", query, reason);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let collaborative = match self.collaborative(user_id, n) {
            Ok(recs) => recs,
            Err(RecommendError::UnknownUser(user)) => {
                warn!("User {} has no ratings, using content-based results only", user);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        Ok(combine(&popularity, &collaborative, n))
    }

    /// Resolve recommendations into rows with title, genres and stats
    pub fn describe(&self, recommendations: &[Recommendation]) -> Vec<RecommendedMovie> {
        recommendations
            .iter()
            .filter_map(|rec| {
                let movie = self.data_index.get_movie(rec.movie_id)?;
                let stats = self.stats_by_movie.get(&rec.movie_id);
                Some((movie, stats, rec))
            })
            .enumerate()
            .map(|(i, (movie, stats, rec))| RecommendedMovie {
                rank: i + 1,
                movie_id: movie.id,
                title: movie.title.clone(),
                genres: movie.genres.iter().cloned().collect(),
                avg_rating: stats.map(|s| s.avg_rating),
                rating_count: stats.map(|s| s.rating_count).unwrap_or(0),
                score: rec.score,
                source: rec.source,
            })
            .collect()
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary::compute(self.data_index.movies(), self.data_index.ratings(), &self.stats)
    }

    /// RMSE / MAE of the baseline predictors on a held-out split
    pub fn evaluate(&self) -> Result<AccuracyReport> {
        evaluation::evaluate_accuracy(
            self.data_index.ratings(),
            self.config.test_fraction,
            self.config.split_seed,
        )
    }

    /// Precision@k of collaborative recommendations built from the
    /// training split, checked against the user's held-out ratings.
    #[instrument(skip(self))]
    pub fn collaborative_precision(&self, user_id: UserId, k: usize) -> Result<f64> {
        let (train, test) = evaluation::train_test_split(
            self.data_index.ratings(),
            self.config.test_fraction,
            self.config.split_seed,
        );

        // Built directly: the training split must not replace the cached matrix
        let matrix = UserSimilarityMatrix::build(&train);
        let recs = self.collaborative.recommend_with_matrix(user_id, &train, &matrix, k)?;
        let ids: Vec<MovieId> = recs.iter().map(|r| r.movie_id).collect();

        Ok(evaluation::precision_at_k(
            &ids,
            &test,
            user_id,
            k,
            self.config.high_rating_threshold,
        ))
    }
}
