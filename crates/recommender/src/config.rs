//! Tunable parameters shared by the recommendation strategies.

use crate::error::{RecommendError, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration for the recommendation engine.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Reliability threshold for popularity ranking
    pub min_rating_count: u32,
    /// Number of nearest neighbours used by collaborative filtering
    pub neighbors: usize,
    /// Minimum neighbour rating for a movie to become a candidate
    pub high_rating_threshold: f32,
    /// Default size of a collaborative result list
    pub collaborative_limit: usize,
    /// Default size of a hybrid result list
    pub hybrid_limit: usize,
    /// Share of ratings held out by the accuracy evaluation
    pub test_fraction: f64,
    /// Seed for the evaluation shuffle
    pub split_seed: u64,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            min_rating_count: 10,
            neighbors: 5,
            high_rating_threshold: 4.0,
            collaborative_limit: 10,
            hybrid_limit: 10,
            test_fraction: 0.2,
            split_seed: 42,
        }
    }
}

impl RecommenderConfig {
    /// Load overrides from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RecommendError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| RecommendError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.neighbors == 0 {
            return Err(RecommendError::Config("neighbors must be positive".to_string()));
        }
        if self.test_fraction <= 0.0 || self.test_fraction >= 1.0 {
            return Err(RecommendError::Config(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        Ok(())
    }
}
