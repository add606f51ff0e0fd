//! Core domain types for the MovieLens dataset.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for domain clarity (UserId, MovieId)
//! - `Movie` and `Rating`, the two immutable input tables
//! - `MovieStats`, the per-movie aggregate derived from ratings
//! - `DataIndex`, the in-memory catalog holding both tables plus lookups

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

/// Tag used by MovieLens for movies without any genre.
///
/// It stays on the movie record but never enters the genre universe.
pub const NO_GENRES_LISTED: &str = "(no genres listed)";

// =============================================================================
// Movie
// =============================================================================

/// Represents a movie in the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Genre tags, pre-split from the `|`-delimited field
    pub genres: BTreeSet<String>,
}

impl Movie {
    /// Build a movie from the raw `|`-delimited genre field.
    pub fn new(id: MovieId, title: impl Into<String>, genre_field: &str) -> Self {
        Self {
            id,
            title: title.into(),
            genres: split_genre_field(genre_field),
        }
    }

    /// Exact tag membership, never substring matching.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.contains(genre)
    }

    /// True when the movie carries every one of `genres`.
    pub fn has_all_genres<'a, I>(&self, genres: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        genres.into_iter().all(|genre| self.has_genre(genre))
    }

    /// Genres rendered for display, e.g. "Comedy, Romance"
    pub fn genre_label(&self) -> String {
        self.genres.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

/// Split a `|`-delimited genre field into its distinct tags.
///
/// Example: "Action|Adventure|Sci-Fi" -> {"Action", "Adventure", "Sci-Fi"}
pub fn split_genre_field(field: &str) -> BTreeSet<String> {
    field
        .split('|')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Rating Type
// =============================================================================

/// Represents a single rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 0.5 to 5.0 in half-star steps
    pub rating: f32,
    /// Unix timestamp when rating was made (unused by scoring)
    pub timestamp: i64,
}

impl Rating {
    pub const MIN_VALUE: f32 = 0.5;
    pub const MAX_VALUE: f32 = 5.0;

    pub fn new(user_id: UserId, movie_id: MovieId, rating: f32) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
            timestamp: 0,
        }
    }

    pub fn is_valid_value(value: f32) -> bool {
        (Self::MIN_VALUE..=Self::MAX_VALUE).contains(&value)
    }
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Aggregated statistics for one rated movie.
///
/// Only movies with at least one rating get a `MovieStats`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovieStats {
    pub movie_id: MovieId,
    pub rating_count: u32,
    /// Arithmetic mean of the movie's ratings, rounded to 3 decimals
    pub avg_rating: f64,
    /// Popularity score derived from rating count and average
    pub popularity_score: f64,
}

// =============================================================================
// DataIndex - The Core In-Memory Catalog
// =============================================================================

/// Holds both input tables and the lookups built over them.
///
/// The movie table keeps its file order: ranking ties are broken by it.
#[derive(Debug, Default)]
pub struct DataIndex {
    // Primary data stores, in table order
    pub(crate) movies: Vec<Movie>,
    pub(crate) ratings: Vec<Rating>,

    /// Position of each movie inside `movies`
    pub(crate) movie_positions: HashMap<MovieId, usize>,

    // Rating indices for fast lookups
    pub(crate) user_ratings: HashMap<UserId, Vec<Rating>>,
    pub(crate) movie_ratings: HashMap<MovieId, Vec<Rating>>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from already parsed tables.
    pub fn from_tables(movies: Vec<Movie>, ratings: Vec<Rating>) -> Self {
        let mut index = Self::new();
        for movie in movies {
            index.insert_movie(movie);
        }
        for rating in ratings {
            index.insert_rating(rating);
        }
        index
    }

    /// The movie table in its original order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// The rating table in its original order
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movie_positions.get(&id).map(|&pos| &self.movies[pos])
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if user has no ratings
    pub fn get_user_ratings(&self, user_id: UserId) -> &[Rating] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get all ratings for a movie
    pub fn get_movie_ratings(&self, movie_id: MovieId) -> &[Rating] {
        self.movie_ratings
            .get(&movie_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct users that rated at least one movie, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.user_ratings.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Insert a movie; a repeated id replaces the earlier record in place
    pub fn insert_movie(&mut self, movie: Movie) {
        match self.movie_positions.get(&movie.id) {
            Some(&pos) => self.movies[pos] = movie,
            None => {
                self.movie_positions.insert(movie.id, self.movies.len());
                self.movies.push(movie);
            }
        }
    }

    /// Insert a rating and update indices
    pub fn insert_rating(&mut self, rating: Rating) {
        self.ratings.push(rating);

        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .push(rating);

        self.movie_ratings
            .entry(rating.movie_id)
            .or_default()
            .push(rating);
    }

    /// Get counts for debugging/validation: (users, movies, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.user_ratings.len(), self.movies.len(), self.ratings.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_genre_field() {
        let genres = split_genre_field("Comedy|Romance|Comedy");
        assert_eq!(genres.len(), 2);
        assert!(genres.contains("Comedy"));
        assert!(genres.contains("Romance"));
    }

    #[test]
    fn test_sentinel_kept_on_movie() {
        let movie = Movie::new(7, "Unknown (2018)", NO_GENRES_LISTED);
        assert!(movie.has_genre(NO_GENRES_LISTED));
        assert_eq!(movie.genres.len(), 1);
    }

    #[test]
    fn test_exact_genre_membership() {
        // "Romance" must not match a tag that merely contains it
        let movie = Movie::new(1, "Tagged", "Dark Romance|Drama");
        assert!(!movie.has_genre("Romance"));
        assert!(movie.has_all_genres(["Drama", "Dark Romance"]));
        assert!(!movie.has_all_genres(["Drama", "Comedy"]));
    }

    #[test]
    fn test_movie_order_preserved() {
        let mut index = DataIndex::new();
        index.insert_movie(Movie::new(30, "C", "Drama"));
        index.insert_movie(Movie::new(10, "A", "Drama"));
        index.insert_movie(Movie::new(20, "B", "Drama"));

        let ids: Vec<MovieId> = index.movies().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
        assert_eq!(index.get_movie(10).unwrap().title, "A");
    }

    #[test]
    fn test_rating_value_bounds() {
        assert!(Rating::is_valid_value(0.5));
        assert!(Rating::is_valid_value(5.0));
        assert!(!Rating::is_valid_value(0.0));
        assert!(!Rating::is_valid_value(5.5));
    }
}
