//! Similarity Engine - pairwise cosine similarity between users
//!
//! Each user is a vector over every rated movie, with unrated movies
//! counting as 0. Rows are stored sparsely: a zero contributes nothing
//! to a dot product, so only co-rated movies are visited while the
//! result stays identical to the dense zero-filled computation.
//!
//! Cost is O(U²) similarities and O(U²) memory for U users, which is
//! fine for thousands of users and no more.

use data_loader::{MovieId, Rating, UserId};
use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Sparse rating vector, sorted by movie id
type SparseRow = Vec<(MovieId, f64)>;

/// Symmetric user x user cosine similarity table
#[derive(Debug, Clone, PartialEq)]
pub struct UserSimilarityMatrix {
    /// Users in ascending id order; row/column i belongs to users[i]
    users: Vec<UserId>,
    positions: HashMap<UserId, usize>,
    /// Row-major, users.len() x users.len()
    values: Vec<f64>,
}

impl UserSimilarityMatrix {
    /// Build the matrix from raw ratings.
    ///
    /// One row per distinct user. If a (user, movie) pair occurs more than
    /// once its values are averaged.
    #[instrument(skip(ratings), fields(ratings = ratings.len()))]
    pub fn build(ratings: &[Rating]) -> Self {
        let mut grouped: BTreeMap<UserId, BTreeMap<MovieId, (f64, u32)>> = BTreeMap::new();
        for rating in ratings {
            let cell = grouped
                .entry(rating.user_id)
                .or_default()
                .entry(rating.movie_id)
                .or_insert((0.0, 0));
            cell.0 += rating.rating as f64;
            cell.1 += 1;
        }

        let users: Vec<UserId> = grouped.keys().copied().collect();
        let rows: Vec<SparseRow> = grouped
            .into_values()
            .map(|movies| {
                movies
                    .into_iter()
                    .map(|(movie_id, (sum, count))| (movie_id, sum / count as f64))
                    .collect()
            })
            .collect();
        let norms: Vec<f64> = rows
            .iter()
            .map(|row| row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt())
            .collect();

        let n = users.len();

        // Upper triangle, one row per task
        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| cosine(&rows[i], norms[i], &rows[j], norms[j]))
                    .collect()
            })
            .collect();

        let mut values = vec![0.0; n * n];
        for (i, row) in upper.into_iter().enumerate() {
            values[i * n + i] = if norms[i] > 0.0 { 1.0 } else { 0.0 };
            for (offset, similarity) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                values[i * n + j] = similarity;
                values[j * n + i] = similarity;
            }
        }

        let positions = users.iter().enumerate().map(|(i, &u)| (u, i)).collect();

        debug!("Built {}x{} similarity matrix", n, n);
        Self {
            users,
            positions,
            values,
        }
    }

    /// Similarity between two users, `None` if either has no row
    pub fn similarity(&self, a: UserId, b: UserId) -> Option<f64> {
        let i = *self.positions.get(&a)?;
        let j = *self.positions.get(&b)?;
        Some(self.values[i * self.users.len() + j])
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.positions.contains_key(&user_id)
    }

    /// Users with a row, ascending
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// The `k` users most similar to `user_id`, excluding the user itself.
    ///
    /// Sorted by similarity descending; equal similarities keep ascending
    /// user id order. `None` if the user has no row.
    pub fn most_similar(&self, user_id: UserId, k: usize) -> Option<Vec<(UserId, f64)>> {
        let i = *self.positions.get(&user_id)?;
        let n = self.users.len();
        let row = &self.values[i * n..(i + 1) * n];

        let mut neighbors: Vec<(UserId, f64)> = self
            .users
            .iter()
            .zip(row)
            .filter(|(other, _)| **other != user_id)
            .map(|(&other, &similarity)| (other, similarity))
            .collect();

        neighbors.sort_by(|a, b| b.1.total_cmp(&a.1));
        neighbors.truncate(k);
        Some(neighbors)
    }
}

/// Dot product over the movies both rows rated
fn dot(a: &[(MovieId, f64)], b: &[(MovieId, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut total = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                total += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    total
}

/// Cosine similarity; a zero vector is similar to nothing
fn cosine(a: &[(MovieId, f64)], norm_a: f64, b: &[(MovieId, f64)], norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Content fingerprint of a rating collection.
///
/// Timestamps are ignored since they never influence similarity.
pub fn ratings_fingerprint(ratings: &[Rating]) -> u64 {
    let mut hasher = DefaultHasher::new();
    ratings.len().hash(&mut hasher);
    for rating in ratings {
        rating.user_id.hash(&mut hasher);
        rating.movie_id.hash(&mut hasher);
        rating.rating.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

/// Memoizes the last matrix built, keyed by the ratings' fingerprint.
///
/// A lookup with different ratings rebuilds; `invalidate` forces the
/// next lookup to rebuild.
#[derive(Debug, Default)]
pub struct SimilarityCache {
    entry: Option<(u64, Arc<UserSimilarityMatrix>)>,
    builds: usize,
}

impl SimilarityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&mut self, ratings: &[Rating]) -> Arc<UserSimilarityMatrix> {
        let key = ratings_fingerprint(ratings);
        if let Some((cached_key, matrix)) = &self.entry {
            if *cached_key == key {
                debug!("Similarity cache hit");
                return Arc::clone(matrix);
            }
        }

        let matrix = Arc::new(UserSimilarityMatrix::build(ratings));
        self.entry = Some((key, Arc::clone(&matrix)));
        self.builds += 1;
        matrix
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// How many matrices this cache has built
    pub fn builds(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings() -> Vec<Rating> {
        vec![
            // user 1 and 2 rate the same movies identically
            Rating::new(1, 10, 5.0),
            Rating::new(1, 20, 3.0),
            Rating::new(2, 10, 5.0),
            Rating::new(2, 20, 3.0),
            // user 3 shares only movie 20
            Rating::new(3, 20, 4.0),
            Rating::new(3, 30, 4.0),
            // user 4 shares nothing
            Rating::new(4, 40, 2.0),
        ]
    }

    #[test]
    fn test_self_similarity_is_one() {
        let matrix = UserSimilarityMatrix::build(&ratings());
        for &user in matrix.users() {
            assert_eq!(matrix.similarity(user, user), Some(1.0));
        }
    }

    #[test]
    fn test_symmetric() {
        let matrix = UserSimilarityMatrix::build(&ratings());
        for &a in matrix.users() {
            for &b in matrix.users() {
                assert_eq!(matrix.similarity(a, b), matrix.similarity(b, a));
            }
        }
    }

    #[test]
    fn test_cosine_values() {
        let matrix = UserSimilarityMatrix::build(&ratings());

        assert!((matrix.similarity(1, 2).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(matrix.similarity(1, 4), Some(0.0));

        // user1 = (5, 3, 0), user3 = (0, 4, 4): 12 / (sqrt(34) * sqrt(32))
        let expected = 12.0 / (34f64.sqrt() * 32f64.sqrt());
        assert!((matrix.similarity(1, 3).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_user() {
        let matrix = UserSimilarityMatrix::build(&ratings());
        assert!(!matrix.contains(99));
        assert_eq!(matrix.similarity(1, 99), None);
        assert!(matrix.most_similar(99, 5).is_none());
    }

    #[test]
    fn test_most_similar_excludes_self() {
        let matrix = UserSimilarityMatrix::build(&ratings());
        let neighbors = matrix.most_similar(1, 2).unwrap();

        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].0, 2);
        assert_eq!(neighbors[1].0, 3);
        assert!(neighbors.iter().all(|(user, _)| *user != 1));
    }

    #[test]
    fn test_dense_layout() {
        let matrix = UserSimilarityMatrix::build(&ratings());
        assert_eq!(matrix.len(), 4);
        assert_eq!(matrix.users(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_input() {
        let matrix = UserSimilarityMatrix::build(&[]);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_cache_reuses_and_invalidates() {
        let ratings = ratings();
        let mut cache = SimilarityCache::new();

        let first = cache.get_or_build(&ratings);
        let second = cache.get_or_build(&ratings);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.builds(), 1);

        let mut changed = ratings.clone();
        changed.push(Rating::new(5, 10, 1.0));
        let third = cache.get_or_build(&changed);
        assert!(third.contains(5));
        assert_eq!(cache.builds(), 2);

        cache.invalidate();
        cache.get_or_build(&changed);
        assert_eq!(cache.builds(), 3);
    }
}
