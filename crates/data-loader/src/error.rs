//! Error types for the data-loader crate.
//!
//! Every failure while reading or validating the MovieLens tables is
//! reported through [`DataLoadError`]; the recommender core never sees a
//! partially loaded dataset.

use thiserror::Error;

use crate::types::{MovieId, UserId};

/// Errors that can occur during data loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Row in a data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The same user rated the same movie more than once
    #[error("Duplicate rating for user {user_id} and movie {movie_id}")]
    DuplicateRating { user_id: UserId, movie_id: MovieId },

    /// Referenced entity doesn't exist (e.g., rating for non-existent movie)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: u32 },
}

impl DataLoadError {
    /// Wrap a csv error with the file it came from.
    pub(crate) fn from_csv(file: &str, err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        DataLoadError::ParseError {
            file: file.to_string(),
            line,
            reason: err.to_string(),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
