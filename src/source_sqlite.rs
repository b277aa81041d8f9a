//! SQLite-backed [`DataSource`].
//!
//! Reads the `ratings` and `items` tables written by `rec import`.
//! Ratings are returned in insertion (`rowid`) order, which fixes the
//! candidate enumeration order and therefore how score ties are broken.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use itemrec_core::models::{Item, Rating};
use itemrec_core::store::Dataset;

use crate::config::Config;
use crate::db;
use crate::source::DataSource;

/// Loads the snapshot from the configured SQLite database.
pub struct SqliteSource {
    config: Config,
}

impl SqliteSource {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DataSource for SqliteSource {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(&self) -> Result<Dataset> {
        let pool = db::connect(&self.config).await?;
        let dataset = load_dataset(&pool).await.with_context(|| {
            format!(
                "Failed to load ratings from {} (did you run `rec init` and `rec import`?)",
                self.config.db.path.display()
            )
        });
        pool.close().await;
        dataset
    }
}

/// Read every rating and item from an open pool.
pub async fn load_dataset(pool: &SqlitePool) -> Result<Dataset> {
    let rating_rows = sqlx::query(
        "SELECT user_id, item_id, rating, timestamp FROM ratings ORDER BY rowid ASC",
    )
    .fetch_all(pool)
    .await?;

    let ratings: Vec<Rating> = rating_rows
        .iter()
        .map(|row| Rating {
            user_id: row.get("user_id"),
            item_id: row.get("item_id"),
            value: row.get("rating"),
            timestamp: row.get("timestamp"),
        })
        .collect();

    let item_rows = sqlx::query("SELECT item_id, title, genres FROM items ORDER BY item_id ASC")
        .fetch_all(pool)
        .await?;

    let items: Vec<Item> = item_rows
        .iter()
        .map(|row| {
            let genres: String = row.get("genres");
            Item::with_genre_list(row.get("item_id"), row.get::<String, _>("title"), &genres)
        })
        .collect();

    Ok(Dataset { ratings, items })
}
