//! CSV data source.
//!
//! Reads MovieLens-style files:
//!
//! ```text
//! ratings.csv   userId,movieId,rating,timestamp
//! movies.csv    movieId,title,genres
//! ```
//!
//! Column names may also be given in snake case (`user_id`, `item_id`,
//! `movie_id`). `timestamp` and `genres` are optional. Values are trimmed.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use itemrec_core::models::{Item, Rating};
use itemrec_core::store::Dataset;

use crate::source::DataSource;

#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "userId", alias = "user_id")]
    user_id: i64,
    #[serde(rename = "movieId", alias = "movie_id", alias = "item_id")]
    item_id: i64,
    rating: f64,
    #[serde(default)]
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct ItemRow {
    #[serde(rename = "movieId", alias = "movie_id", alias = "item_id")]
    item_id: i64,
    title: String,
    #[serde(default)]
    genres: String,
}

/// Reads ratings and items straight from CSV files, without a database.
pub struct CsvSource {
    ratings_path: PathBuf,
    items_path: PathBuf,
}

impl CsvSource {
    pub fn new(ratings_path: PathBuf, items_path: PathBuf) -> Self {
        Self {
            ratings_path,
            items_path,
        }
    }
}

#[async_trait]
impl DataSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn load(&self) -> Result<Dataset> {
        Ok(Dataset {
            ratings: read_ratings_csv(&self.ratings_path)?,
            items: read_items_csv(&self.items_path)?,
        })
    }
}

/// Parse a ratings file. Fails on the first malformed row.
pub fn read_ratings_csv(path: &Path) -> Result<Vec<Rating>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open ratings file: {}", path.display()))?;

    let mut ratings = Vec::new();
    for (idx, result) in reader.deserialize::<RatingRow>().enumerate() {
        // +2: one for the header, one for 1-based line numbers.
        let line = idx + 2;
        let row = result
            .with_context(|| format!("{}:{}: invalid rating row", path.display(), line))?;
        if !row.rating.is_finite() {
            bail!("{}:{}: rating must be a finite number", path.display(), line);
        }
        ratings.push(Rating {
            user_id: row.user_id,
            item_id: row.item_id,
            value: row.rating,
            timestamp: row.timestamp,
        });
    }

    Ok(ratings)
}

/// Parse an items (movies) file. Fails on the first malformed row.
pub fn read_items_csv(path: &Path) -> Result<Vec<Item>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open items file: {}", path.display()))?;

    let mut items = Vec::new();
    for (idx, result) in reader.deserialize::<ItemRow>().enumerate() {
        let line = idx + 2;
        let row =
            result.with_context(|| format!("{}:{}: invalid item row", path.display(), line))?;
        items.push(Item::with_genre_list(row.item_id, row.title, &row.genres));
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reads_movielens_layout() {
        let tmp = TempDir::new().unwrap();
        let ratings = tmp.path().join("ratings.csv");
        let movies = tmp.path().join("movies.csv");
        fs::write(
            &ratings,
            "userId,movieId,rating,timestamp\n1,1,4.0,964982703\n1,3,4.5,964981247\n",
        )
        .unwrap();
        fs::write(
            &movies,
            "movieId,title,genres\n1,Toy Story (1995),Adventure|Animation\n3,\"Grumpier Old Men, The (1995)\",Comedy|Romance\n",
        )
        .unwrap();

        let ratings = read_ratings_csv(&ratings).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[1].item_id, 3);
        assert_eq!(ratings[1].value, 4.5);
        assert_eq!(ratings[0].timestamp, 964982703);

        let items = read_items_csv(&movies).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title, "Grumpier Old Men, The (1995)");
        assert_eq!(items[0].genres, vec!["Adventure", "Animation"]);
    }

    #[test]
    fn test_snake_case_headers_and_optional_columns() {
        let tmp = TempDir::new().unwrap();
        let ratings = tmp.path().join("r.csv");
        let items = tmp.path().join("i.csv");
        fs::write(&ratings, "user_id, item_id, rating\n 7 , 9 , 3.5 \n").unwrap();
        fs::write(&items, "item_id,title\n9,Nine\n").unwrap();

        let ratings = read_ratings_csv(&ratings).unwrap();
        assert_eq!(ratings[0].user_id, 7);
        assert_eq!(ratings[0].timestamp, 0);
        let items = read_items_csv(&items).unwrap();
        assert!(items[0].genres.is_empty());
    }

    #[test]
    fn test_bad_row_reports_line() {
        let tmp = TempDir::new().unwrap();
        let ratings = tmp.path().join("ratings.csv");
        fs::write(&ratings, "userId,movieId,rating,timestamp\n1,1,4.0,0\n1,x,4.0,0\n").unwrap();
        let err = read_ratings_csv(&ratings).unwrap_err();
        assert!(format!("{:#}", err).contains(":3:"), "got: {:#}", err);
    }

    #[test]
    fn test_missing_file() {
        let err = read_items_csv(Path::new("/nonexistent/movies.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open items file"));
    }

    #[tokio::test]
    async fn test_csv_source_loads_dataset() {
        let tmp = TempDir::new().unwrap();
        let ratings = tmp.path().join("ratings.csv");
        let movies = tmp.path().join("movies.csv");
        fs::write(&ratings, "userId,movieId,rating,timestamp\n1,1,4.0,0\n").unwrap();
        fs::write(&movies, "movieId,title,genres\n1,One,Drama\n").unwrap();

        let source = CsvSource::new(ratings, movies);
        assert_eq!(source.name(), "csv");
        let dataset = source.load().await.unwrap();
        assert_eq!(dataset.ratings.len(), 1);
        assert_eq!(dataset.items.len(), 1);
    }
}
