//! Database schema migrations.
//!
//! Every statement is `IF NOT EXISTS`, so `rec init` can run any number
//! of times.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Apply the schema to an open pool.
pub async fn apply(pool: &SqlitePool) -> Result<()> {
    // One rating per (user, item); re-imports overwrite.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ratings (
            user_id INTEGER NOT NULL,
            item_id INTEGER NOT NULL,
            rating REAL NOT NULL,
            timestamp INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, item_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            item_id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            genres TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_ratings_item_id ON ratings(item_id)")
        .execute(pool)
        .await?;

    Ok(())
}
