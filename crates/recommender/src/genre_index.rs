//! Genre Index: the universe of genre tags seen in the catalog.

use data_loader::{Movie, NO_GENRES_LISTED};
use std::collections::BTreeSet;

/// Sorted, duplicate-free set of genre tags, without the no-genre sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreIndex {
    genres: BTreeSet<String>,
}

impl GenreIndex {
    /// Collect every distinct tag across `movies`.
    pub fn from_movies(movies: &[Movie]) -> Self {
        let genres = movies
            .iter()
            .flat_map(|movie| movie.genres.iter())
            .filter(|genre| genre.as_str() != NO_GENRES_LISTED)
            .cloned()
            .collect();
        Self { genres }
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.genres.contains(genre)
    }

    /// Tags from `requested` that are not part of the universe, in request order
    pub fn unknown<'a, I>(&self, requested: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        requested
            .into_iter()
            .filter(|genre| !self.contains(genre))
            .map(str::to_string)
            .collect()
    }

    /// Lexicographically ordered tags
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genres.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.genres.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies() -> Vec<Movie> {
        vec![
            Movie::new(1, "A", "Comedy|Romance"),
            Movie::new(2, "B", "Action|Comedy"),
            Movie::new(3, "C", NO_GENRES_LISTED),
            Movie::new(4, "D", "Sci-Fi|Action"),
        ]
    }

    #[test]
    fn test_sorted_without_duplicates_or_sentinel() {
        let index = GenreIndex::from_movies(&movies());

        assert_eq!(index.to_vec(), vec!["Action", "Comedy", "Romance", "Sci-Fi"]);
        assert!(!index.contains(NO_GENRES_LISTED));
    }

    #[test]
    fn test_unknown_preserves_request_order() {
        let index = GenreIndex::from_movies(&movies());
        let unknown = index.unknown(["Noir", "Comedy", "Western"]);
        assert_eq!(unknown, vec!["Noir", "Western"]);
    }

    #[test]
    fn test_empty_catalog() {
        let index = GenreIndex::from_movies(&[]);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }
}
