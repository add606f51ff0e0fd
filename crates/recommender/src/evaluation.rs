//! Offline accuracy evaluation.
//!
//! Holds out a seeded random share of the ratings, fits two trivial
//! predictors on the rest, and reports their RMSE and MAE. Also provides
//! precision@k for a ranked list against a user's held-out favourites.

use crate::error::{RecommendError, Result};
use data_loader::{MovieId, Rating, UserId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument};

/// Root mean squared error and mean absolute error of one predictor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorMetrics {
    pub rmse: f64,
    pub mae: f64,
}

impl ErrorMetrics {
    /// Compare predictions against actual values, pairwise.
    fn from_pairs(pairs: impl Iterator<Item = (f64, f64)>) -> Self {
        let (mut squared, mut absolute, mut count) = (0.0, 0.0, 0usize);
        for (actual, predicted) in pairs {
            let err = actual - predicted;
            squared += err * err;
            absolute += err.abs();
            count += 1;
        }
        if count == 0 {
            return Self { rmse: 0.0, mae: 0.0 };
        }
        Self {
            rmse: (squared / count as f64).sqrt(),
            mae: absolute / count as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracyReport {
    /// Predict the global training mean for everything
    pub baseline: ErrorMetrics,
    /// Predict each user's training mean, global mean for unseen users
    pub user_average: ErrorMetrics,
    pub train_size: usize,
    pub test_size: usize,
}

/// Shuffle with a fixed seed and hold out `ceil(len * test_fraction)` ratings.
///
/// Returns `(train, test)`.
pub fn train_test_split(ratings: &[Rating], test_fraction: f64, seed: u64) -> (Vec<Rating>, Vec<Rating>) {
    let mut shuffled = ratings.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let test_size = ((ratings.len() as f64) * test_fraction).ceil() as usize;
    let test_size = test_size.min(shuffled.len());
    let train = shuffled.split_off(test_size);
    (train, shuffled)
}

/// Evaluate the baseline and user-average predictors.
#[instrument(skip(ratings), fields(ratings = ratings.len()))]
pub fn evaluate_accuracy(ratings: &[Rating], test_fraction: f64, seed: u64) -> Result<AccuracyReport> {
    let (train, test) = train_test_split(ratings, test_fraction, seed);
    if train.is_empty() || test.is_empty() {
        return Err(RecommendError::InsufficientData(format!(
            "{} ratings cannot be split into train and test sets",
            ratings.len()
        )));
    }

    let global_mean = train.iter().map(|r| r.rating as f64).sum::<f64>() / train.len() as f64;

    let mut per_user: HashMap<UserId, (f64, u32)> = HashMap::new();
    for rating in &train {
        let entry = per_user.entry(rating.user_id).or_insert((0.0, 0));
        entry.0 += rating.rating as f64;
        entry.1 += 1;
    }
    let user_mean = |user_id: UserId| {
        per_user
            .get(&user_id)
            .map(|&(sum, count)| sum / count as f64)
            .unwrap_or(global_mean)
    };

    let baseline = ErrorMetrics::from_pairs(test.iter().map(|r| (r.rating as f64, global_mean)));
    let user_average =
        ErrorMetrics::from_pairs(test.iter().map(|r| (r.rating as f64, user_mean(r.user_id))));

    info!(
        "Baseline RMSE {:.3} / MAE {:.3}, user-average RMSE {:.3} / MAE {:.3}",
        baseline.rmse, baseline.mae, user_average.rmse, user_average.mae
    );

    Ok(AccuracyReport {
        baseline,
        user_average,
        train_size: train.len(),
        test_size: test.len(),
    })
}

/// Share of the first `k` recommended movies the user rated >= `like_threshold`
/// in `test`.
///
/// Zero when `k` is zero or the user liked nothing in the test set.
pub fn precision_at_k(
    recommended: &[MovieId],
    test: &[Rating],
    user_id: UserId,
    k: usize,
    like_threshold: f32,
) -> f64 {
    if k == 0 {
        return 0.0;
    }

    let liked: HashSet<MovieId> = test
        .iter()
        .filter(|r| r.user_id == user_id && r.rating >= like_threshold)
        .map(|r| r.movie_id)
        .collect();
    if liked.is_empty() {
        return 0.0;
    }

    let top: HashSet<MovieId> = recommended.iter().take(k).copied().collect();
    let hits = top.intersection(&liked).count();
    hits as f64 / k as f64
}
