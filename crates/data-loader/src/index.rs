//! DataIndex loading and validation.
//!
//! Parses movies.csv and ratings.csv in parallel, builds the rating
//! indices, and checks the invariants the recommender relies on.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

impl DataIndex {
    /// Load the MovieLens dataset from a directory
    ///
    /// Steps:
    /// 1. Parse movies.csv and ratings.csv in parallel
    /// 2. Build the primary tables and rating indices
    /// 3. Validate data integrity
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading MovieLens dataset from {:?}", data_dir);

        let movies_path = data_dir.join("movies.csv");
        let ratings_path = data_dir.join("ratings.csv");

        let (movies, ratings) = rayon::join(
            || parser::parse_movies(&movies_path),
            || parser::parse_ratings(&ratings_path),
        );
        let movies = movies?;
        let ratings = ratings?;

        info!("Loaded {} movies, {} ratings", movies.len(), ratings.len());

        let index = DataIndex::from_tables(movies, ratings);
        index.validate()?;

        info!("DataIndex successfully built and validated");
        Ok(index)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - Every rating references a movie in the catalog
    /// - Rating values are within [0.5, 5.0]
    /// - No user rated the same movie twice
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<(UserId, MovieId)> = HashSet::with_capacity(self.ratings.len());

        for rating in &self.ratings {
            if !self.movie_positions.contains_key(&rating.movie_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "Movie".to_string(),
                    id: rating.movie_id,
                });
            }
            if !Rating::is_valid_value(rating.rating) {
                return Err(DataLoadError::InvalidValue {
                    field: "rating".to_string(),
                    value: rating.rating.to_string(),
                });
            }
            if !seen.insert((rating.user_id, rating.movie_id)) {
                return Err(DataLoadError::DuplicateRating {
                    user_id: rating.user_id,
                    movie_id: rating.movie_id,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_index() -> DataIndex {
        DataIndex::from_tables(
            vec![
                Movie::new(1, "Toy Story (1995)", "Animation|Comedy"),
                Movie::new(2, "Heat (1995)", "Action|Crime|Thriller"),
            ],
            vec![Rating::new(1, 1, 4.0), Rating::new(2, 1, 3.5), Rating::new(2, 2, 5.0)],
        )
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample_index().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_movie() {
        let mut index = sample_index();
        index.insert_rating(Rating::new(3, 99, 4.0));

        let err = index.validate().unwrap_err();
        assert!(matches!(err, DataLoadError::MissingReference { id: 99, .. }));
    }

    #[test]
    fn test_validate_duplicate_pair() {
        let mut index = sample_index();
        index.insert_rating(Rating::new(1, 1, 2.0));

        let err = index.validate().unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::DuplicateRating { user_id: 1, movie_id: 1 }
        ));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("movies.csv"),
            "movieId,title,genres\n1,Toy Story (1995),Animation|Comedy\n2,Heat (1995),Action\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("ratings.csv"),
            "userId,movieId,rating,timestamp\n1,1,4.0,1\n1,2,3.0,2\n5,1,5.0,3\n",
        )
        .unwrap();

        let index = DataIndex::load_from_files(dir.path()).unwrap();
        let (users, movies, ratings) = index.counts();

        assert_eq!(users, 2);
        assert_eq!(movies, 2);
        assert_eq!(ratings, 3);
        assert_eq!(index.get_user_ratings(1).len(), 2);
        assert_eq!(index.get_movie_ratings(1).len(), 2);
        assert_eq!(index.user_ids(), vec![1, 5]);
    }

    #[test]
    fn test_load_dataset() {
        // Runs only when the real dataset is present next to the workspace
        let data_dir = Path::new("../../data/ml-latest-small");

        if data_dir.exists() {
            let index = DataIndex::load_from_files(data_dir).unwrap();
            let (users, movies, ratings) = index.counts();

            // MovieLens latest-small expected counts
            assert_eq!(users, 610);
            assert_eq!(movies, 9742);
            assert_eq!(ratings, 100836);
        }
    }
}
