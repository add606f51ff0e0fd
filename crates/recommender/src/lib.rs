//! # Recommender Crate
//!
//! Movie recommendation strategies over a loaded `DataIndex`.
//!
//! ## Components
//!
//! ### Popularity Ranker (content-based)
//! Genre-filtered ranking of well-rated movies:
//! - A movie must carry every queried genre
//! - Movies with fewer than 10 ratings are ignored
//! - Score = avg_rating * ln(1 + rating_count)
//!
//! ### Collaborative Recommender
//! "Users most like you rated these highly":
//! - Cosine similarity between users' rating vectors
//! - Candidates come from the 5 nearest users' ratings >= 4.0
//!
//! ### Hybrid Combiner
//! Interleaves both lists without comparing their scores.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use recommender::{GenreQuery, RecommendationEngine, RecommenderConfig};
//! use std::sync::Arc;
//!
//! let index = Arc::new(DataIndex::load_from_files(Path::new("data/ml-latest-small"))?);
//! let mut engine = RecommendationEngine::new(index, RecommenderConfig::default());
//!
//! let query = GenreQuery::parse("Comedy+Romance")?;
//! let top = engine.by_genre(&query, 10)?;
//! let mixed = engine.hybrid(42, &query, 10)?;
//!
//! for row in engine.describe(&mixed) {
//!     println!("{}. {} ({})", row.rank, row.title, row.source);
//! }
//! ```

pub mod aggregator;
pub mod collaborative;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod genre_index;
pub mod hybrid;
pub mod popularity;
pub mod similarity;
pub mod summary;
pub mod types;

// Re-export commonly used types
pub use aggregator::{aggregate_movie_stats, join_with_movies, popularity_score};
pub use collaborative::CollaborativeRecommender;
pub use config::RecommenderConfig;
pub use engine::RecommendationEngine;
pub use error::{NoResultsReason, RecommendError, Result};
pub use evaluation::{AccuracyReport, ErrorMetrics};
pub use genre_index::GenreIndex;
pub use hybrid::combine;
pub use popularity::{GenreQuery, PopularityRanker};
pub use similarity::{SimilarityCache, UserSimilarityMatrix};
pub use summary::DatasetSummary;
pub use types::{RatedMovie, Recommendation, RecommendedMovie, Strategy};
