//! # Data Loader Crate
//!
//! This crate handles loading and indexing the MovieLens "latest-small" dataset.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Rating, MovieStats, DataIndex)
//! - **parser**: Parse movies.csv / ratings.csv into Rust structs
//! - **index**: Load, index and validate the two tables
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/ml-latest-small"))?;
//! let movie = index.get_movie(1).unwrap();
//! let ratings = index.get_user_ratings(1);
//!
//! println!("{} has genres {}", movie.title, movie.genre_label());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    split_genre_field,
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    Rating,
    DataIndex,
    MovieStats,
    NO_GENRES_LISTED,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::new();
        let (users, movies, ratings) = index.counts();

        assert_eq!(users, 0);
        assert_eq!(movies, 0);
        assert_eq!(ratings, 0);
    }

    #[test]
    fn test_insert_rating() {
        let mut index = DataIndex::new();

        index.insert_rating(Rating {
            user_id: 1,
            movie_id: 1193,
            rating: 5.0,
            timestamp: 978300760,
        });

        let user_ratings = index.get_user_ratings(1);
        assert_eq!(user_ratings.len(), 1);
        assert_eq!(user_ratings[0].rating, 5.0);

        let movie_ratings = index.get_movie_ratings(1193);
        assert_eq!(movie_ratings.len(), 1);
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();

        // Querying non-existent data should return None or empty slices
        assert!(index.get_movie(999).is_none());
        assert!(index.get_user_ratings(999).is_empty());
        assert!(index.get_movie_ratings(999).is_empty());
        assert!(index.user_ids().is_empty());
    }
}
