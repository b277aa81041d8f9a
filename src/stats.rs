//! Dataset statistics and consistency overview.
//!
//! Provides a quick summary of what is loaded: rating, user, and item
//! counts, the rating value range, the time span covered, the most-rated
//! items, and any rated items missing from the catalog (those are skipped
//! when recommendations are rendered). Used by `rec stats`.

use anyhow::Result;

use itemrec_core::models::ItemId;
use itemrec_core::store::memory::InMemoryStore;
use itemrec_core::store::{Catalog, Dataset, RatingStore};

use crate::config::Config;
use crate::source;

/// Number of catalog misses listed individually.
const MISSING_SHOWN: usize = 10;

/// Summary of a loaded dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub ratings: usize,
    pub users: usize,
    pub rated_items: usize,
    pub catalog_items: usize,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub mean_rating: Option<f64>,
    pub oldest_ts: Option<i64>,
    pub newest_ts: Option<i64>,
    /// Up to five `(item_id, raters)` pairs, most-rated first.
    pub most_rated: Vec<(ItemId, usize)>,
    pub missing_from_catalog: Vec<ItemId>,
}

impl DatasetStats {
    pub fn compute(dataset: Dataset) -> (Self, InMemoryStore) {
        let values = dataset.ratings.iter().map(|r| r.value);
        let min_rating = values.clone().reduce(f64::min);
        let max_rating = values.clone().reduce(f64::max);
        let mean_rating = if dataset.ratings.is_empty() {
            None
        } else {
            Some(values.sum::<f64>() / dataset.ratings.len() as f64)
        };
        let oldest_ts = dataset.ratings.iter().map(|r| r.timestamp).min();
        let newest_ts = dataset.ratings.iter().map(|r| r.timestamp).max();

        let store = InMemoryStore::from_dataset(dataset);

        let mut most_rated: Vec<(ItemId, usize)> = store
            .rated_items()
            .iter()
            .map(|&id| (id, store.raters_of(id)))
            .collect();
        // Stable: equal counts keep first-seen order.
        most_rated.sort_by(|a, b| b.1.cmp(&a.1));
        most_rated.truncate(5);

        let stats = Self {
            ratings: store.rating_count(),
            users: store.user_count(),
            rated_items: store.rated_item_count(),
            catalog_items: store.item_count(),
            min_rating,
            max_rating,
            mean_rating,
            oldest_ts,
            newest_ts,
            most_rated,
            missing_from_catalog: store.items_missing_from_catalog(),
        };
        (stats, store)
    }

    /// Fraction of the user × item matrix that holds a rating.
    pub fn density(&self) -> f64 {
        let cells = self.users as f64 * self.rated_items as f64;
        if cells == 0.0 {
            0.0
        } else {
            self.ratings as f64 / cells
        }
    }
}

/// Run the stats command: load the configured source and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let source = source::open_source(config);
    let dataset = source.load().await?;
    let (stats, store) = DatasetStats::compute(dataset);

    println!("itemrec — Dataset Stats");
    println!("=======================");
    println!();
    println!("  Source:      {}", source.name());
    if !config.data.is_csv() {
        let db_size = std::fs::metadata(&config.db.path)
            .map(|m| m.len())
            .unwrap_or(0);
        println!("  Database:    {}", config.db.path.display());
        println!("  Size:        {}", format_bytes(db_size));
    }
    println!();
    println!("  Ratings:     {}", stats.ratings);
    println!("  Users:       {}", stats.users);
    println!("  Rated items: {}", stats.rated_items);
    println!("  Catalog:     {}", stats.catalog_items);
    println!("  Density:     {:.4}%", stats.density() * 100.0);

    if let (Some(min), Some(max), Some(mean)) =
        (stats.min_rating, stats.max_rating, stats.mean_rating)
    {
        println!("  Values:      {:.1} – {:.1} (mean {:.2})", min, max, mean);
    }
    if let (Some(oldest), Some(newest)) = (stats.oldest_ts, stats.newest_ts) {
        println!(
            "  Span:        {} → {}",
            format_ts_iso(oldest),
            format_ts_iso(newest)
        );
    }

    if !stats.most_rated.is_empty() {
        println!();
        println!("  Most rated:");
        println!("  {:>8} {:>8}   {}", "ITEM", "RATERS", "TITLE");
        println!("  {}", "-".repeat(60));
        for (item_id, raters) in &stats.most_rated {
            let title = store.title_of(*item_id).unwrap_or("(no catalog entry)");
            println!("  {:>8} {:>8}   {}", item_id, raters, title);
        }
    }

    if !stats.missing_from_catalog.is_empty() {
        println!();
        println!(
            "  Missing from catalog: {} (skipped in recommendations)",
            stats.missing_from_catalog.len()
        );
        let shown: Vec<String> = stats
            .missing_from_catalog
            .iter()
            .take(MISSING_SHOWN)
            .map(|id| id.to_string())
            .collect();
        let more = stats.missing_from_catalog.len().saturating_sub(MISSING_SHOWN);
        if more > 0 {
            println!("    {} … and {} more", shown.join(", "), more);
        } else {
            println!("    {}", shown.join(", "));
        }
    }

    println!();
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ts.to_string())
}
