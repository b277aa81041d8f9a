//! CSV import into SQLite.
//!
//! Coordinates `rec import`: read the configured CSV files → validate →
//! upsert into the `ratings` and `items` tables. The whole import, including
//! the `--replace` deletes, is one transaction. A (user, item) pair that
//! appears twice keeps the last value seen.

use anyhow::{Context, Result};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use itemrec_core::models::{Item, Rating};
use itemrec_core::store::Dataset;

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::progress::{ImportProgressEvent, ImportProgressReporter, NoProgress};
use crate::source_csv::{read_items_csv, read_ratings_csv};

/// Rows emitted between progress events.
const PROGRESS_EVERY: u64 = 5_000;

/// Row counts from one import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub ratings_written: u64,
    pub items_written: u64,
}

/// CLI entry point for `rec import`.
pub async fn run_import(
    config: &Config,
    replace: bool,
    dry_run: bool,
    progress: &dyn ImportProgressReporter,
) -> Result<()> {
    let ratings_path = &config.data.ratings_csv;
    let items_path = &config.data.items_csv;

    progress.report(ImportProgressEvent::Reading {
        file: ratings_path.display().to_string(),
    });
    let ratings = read_ratings_csv(ratings_path)?;
    progress.report(ImportProgressEvent::Reading {
        file: items_path.display().to_string(),
    });
    let items = read_items_csv(items_path)?;

    if dry_run {
        println!("import (dry-run)");
        println!("  ratings found: {}", ratings.len());
        println!("  items found: {}", items.len());
        return Ok(());
    }

    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;
    let stats = import_dataset(&pool, &Dataset { ratings, items }, replace, progress).await?;
    pool.close().await;

    println!("import {}", ratings_path.display());
    println!("  ratings upserted: {}", stats.ratings_written);
    println!("  items upserted: {}", stats.items_written);
    if replace {
        println!("  mode: replace");
    }
    println!("ok");

    Ok(())
}

/// Write a dataset into an open pool whose schema is already applied.
pub async fn import_dataset(
    pool: &SqlitePool,
    dataset: &Dataset,
    replace: bool,
    progress: &dyn ImportProgressReporter,
) -> Result<ImportStats> {
    // Deletes and both tables commit together; any failure rolls back to
    // the previous snapshot.
    let mut tx = pool.begin().await?;

    if replace {
        sqlx::query("DELETE FROM ratings").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM items").execute(&mut *tx).await?;
    }

    let ratings_written = write_ratings(&mut *tx, &dataset.ratings, progress)
        .await
        .context("Failed to write ratings")?;
    let items_written = write_items(&mut *tx, &dataset.items, progress)
        .await
        .context("Failed to write items")?;

    tx.commit().await?;

    info!(ratings_written, items_written, replace, "import finished");

    Ok(ImportStats {
        ratings_written,
        items_written,
    })
}

/// Convenience wrapper for callers that do not report progress.
pub async fn import_dataset_quiet(
    pool: &SqlitePool,
    dataset: &Dataset,
    replace: bool,
) -> Result<ImportStats> {
    import_dataset(pool, dataset, replace, &NoProgress).await
}

async fn write_ratings(
    conn: &mut SqliteConnection,
    ratings: &[Rating],
    progress: &dyn ImportProgressReporter,
) -> Result<u64> {
    let total = ratings.len() as u64;
    let mut written = 0u64;

    for rating in ratings {
        sqlx::query(
            r#"
            INSERT INTO ratings (user_id, item_id, rating, timestamp)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, item_id) DO UPDATE SET
                rating = excluded.rating,
                timestamp = excluded.timestamp
            "#,
        )
        .bind(rating.user_id)
        .bind(rating.item_id)
        .bind(rating.value)
        .bind(rating.timestamp)
        .execute(&mut *conn)
        .await?;

        written += 1;
        if written % PROGRESS_EVERY == 0 || written == total {
            progress.report(ImportProgressEvent::Writing {
                table: "ratings".to_string(),
                n: written,
                total,
            });
        }
    }

    Ok(written)
}

async fn write_items(
    conn: &mut SqliteConnection,
    items: &[Item],
    progress: &dyn ImportProgressReporter,
) -> Result<u64> {
    let total = items.len() as u64;
    let mut written = 0u64;

    for item in items {
        sqlx::query(
            r#"
            INSERT INTO items (item_id, title, genres)
            VALUES (?, ?, ?)
            ON CONFLICT(item_id) DO UPDATE SET
                title = excluded.title,
                genres = excluded.genres
            "#,
        )
        .bind(item.item_id)
        .bind(&item.title)
        .bind(item.genre_list())
        .execute(&mut *conn)
        .await?;

        written += 1;
        if written % PROGRESS_EVERY == 0 || written == total {
            progress.report(ImportProgressEvent::Writing {
                table: "items".to_string(),
                n: written,
                total,
            });
        }
    }

    Ok(written)
}
