//! CSV export of recommendation lists.

use anyhow::{Context, Result};
use recommender::RecommendedMovie;
use serde::Serialize;
use std::path::Path;

/// One exported row
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    title: &'a str,
    genres: String,
    avg_rating: Option<f64>,
    rating_count: u32,
}

impl<'a> From<&'a RecommendedMovie> for ExportRow<'a> {
    fn from(row: &'a RecommendedMovie) -> Self {
        Self {
            title: &row.title,
            genres: row.genres.join("|"),
            avg_rating: row.avg_rating,
            rating_count: row.rating_count,
        }
    }
}

/// Write `rows` to `path` with a `title,genres,avg_rating,rating_count` header
pub fn write_csv(path: &Path, rows: &[RecommendedMovie]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for row in rows {
        writer.serialize(ExportRow::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recommender::Strategy;
    use tempfile::TempDir;

    fn row(rank: usize, title: &str, genres: &[&str], avg: Option<f64>, count: u32) -> RecommendedMovie {
        RecommendedMovie {
            rank,
            movie_id: rank as u32,
            title: title.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            avg_rating: avg,
            rating_count: count,
            score: 1.0,
            source: Strategy::Content,
        }
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recs.csv");
        let rows = vec![
            row(1, "American President, The (1995)", &["Comedy", "Drama"], Some(3.75), 42),
            row(2, "Heat (1995)", &["Action"], None, 0),
        ];

        write_csv(&path, &rows).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "title,genres,avg_rating,rating_count");
        assert_eq!(lines[1], "\"American President, The (1995)\",Comedy|Drama,3.75,42");
        assert_eq!(lines[2], "Heat (1995),Action,,0");
    }

    #[test]
    fn test_unwritable_path() {
        let rows = vec![row(1, "Heat (1995)", &["Action"], Some(4.0), 10)];
        assert!(write_csv(Path::new("/definitely/not/here/recs.csv"), &rows).is_err());
    }
}
