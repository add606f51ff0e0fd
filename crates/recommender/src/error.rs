//! Error types for the recommender crate.
//!
//! Every variant is recoverable: the caller decides whether to reprompt,
//! report "not found" or fall back to another strategy. An empty
//! recommendation list is a success, never one of these errors.

use data_loader::UserId;
use std::fmt;
use thiserror::Error;

/// Why a well-formed genre query produced no ranked movies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResultsReason {
    /// No rated movie carries all of the queried genres
    NoGenreMatch,
    /// Movies matched, but none reached the reliability threshold
    BelowReliabilityThreshold { matched: usize, min_rating_count: u32 },
}

impl fmt::Display for NoResultsReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoResultsReason::NoGenreMatch => write!(f, "no movie matches every genre"),
            NoResultsReason::BelowReliabilityThreshold {
                matched,
                min_rating_count,
            } => write!(
                f,
                "{matched} matching movies, none with at least {min_rating_count} ratings"
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum RecommendError {
    /// The query contained no genre names at all
    #[error("Genre query is empty")]
    EmptyQuery,

    /// The query references genre tags absent from the genre universe
    #[error("Unknown genres: {}", .genres.join(", "))]
    UnknownGenre { genres: Vec<String> },

    /// Well-formed query, zero qualifying movies
    #[error("No movies found for {query}: {reason}")]
    NoResults { query: String, reason: NoResultsReason },

    /// Target user has no row in the similarity matrix
    #[error("User {0} not found in rating data")]
    UnknownUser(UserId),

    /// Not enough ratings to build a train/test split
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A configuration file could not be read or parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;
