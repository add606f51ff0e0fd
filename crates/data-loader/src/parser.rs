//! Parser for MovieLens "latest-small" CSV files.
//!
//! - movies.csv: movieId,title,genres
//! - ratings.csv: userId,movieId,rating,timestamp
//!
//! Both files carry a header row. Titles containing commas are quoted,
//! so the files are read with the `csv` crate rather than split by hand.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// One row of movies.csv
#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
    genres: String,
}

/// One row of ratings.csv
#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
    timestamp: i64,
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|err| open_error(path, err))?;
    Ok(csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file))
}

/// A missing file gets its own variant; anything else stays an I/O error
fn open_error(path: &Path, err: io::Error) -> DataLoadError {
    match err.kind() {
        io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(err),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the movies.csv file
///
/// Genres are pipe-separated: "Adventure|Animation|Children|Comedy|Fantasy"
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let label = file_label(path);
    let mut reader = open_reader(path)?;
    let mut movies = Vec::new();

    for result in reader.deserialize::<MovieRecord>() {
        let record = result.map_err(|e| DataLoadError::from_csv(&label, e))?;
        movies.push(Movie::new(record.movie_id, record.title, &record.genres));
    }

    debug!("Parsed {} movies from {}", movies.len(), label);
    Ok(movies)
}

/// Parse the ratings.csv file
///
/// Rating values outside [0.5, 5.0] are rejected here so that the core
/// never has to re-check them.
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let label = file_label(path);
    let mut reader = open_reader(path)?;
    let mut ratings = Vec::new();

    for result in reader.deserialize::<RatingRecord>() {
        let record = result.map_err(|e| DataLoadError::from_csv(&label, e))?;
        if !Rating::is_valid_value(record.rating) {
            return Err(DataLoadError::InvalidValue {
                field: "rating".to_string(),
                value: record.rating.to_string(),
            });
        }
        ratings.push(Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            rating: record.rating,
            timestamp: record.timestamp,
        });
    }

    debug!("Parsed {} ratings from {}", ratings.len(), label);
    Ok(ratings)
}
