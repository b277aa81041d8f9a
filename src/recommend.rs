//! Top-N similar-item recommendations.
//!
//! This module provides the application-level entry points. The ranking
//! algorithm lives in `itemrec-core::recommend` and runs against the
//! in-memory snapshot; this wrapper handles input parsing, snapshot
//! loading, and CLI output formatting.

use anyhow::Result;

pub use itemrec_core::models::{Recommendation, ScoreExplanation};
pub use itemrec_core::query::RecommendQuery;
use itemrec_core::query::parse_item_id;
use itemrec_core::recommend::Recommender;
use itemrec_core::store::memory::InMemoryStore;

use crate::config::Config;
use crate::source;

/// Core recommendation function returning structured results.
///
/// Shared by `rec recommend` (CLI). The HTTP server keeps its snapshot
/// loaded and calls [`recommend_from_store`] directly.
pub async fn recommend_items(
    config: &Config,
    raw_item_id: &str,
    limit: Option<usize>,
    explain: bool,
) -> Result<Vec<Recommendation>> {
    let item_id = parse_item_id(raw_item_id)?;
    let query = RecommendQuery::new(item_id)
        .with_top_n(limit.unwrap_or(config.recommend.default_top_n))
        .with_explain(explain);

    let store = source::load_store(config).await?;
    Ok(recommend_from_store(&store, &query))
}

/// Run a query against an already-loaded snapshot.
pub fn recommend_from_store(
    store: &InMemoryStore,
    query: &RecommendQuery,
) -> Vec<Recommendation> {
    Recommender::new(store).recommend_titled(query)
}

/// CLI entry point: calls [`recommend_items`] and prints results to stdout.
pub async fn run_recommend(
    config: &Config,
    raw_item_id: &str,
    limit: Option<usize>,
    explain: bool,
    json: bool,
) -> Result<()> {
    let results = recommend_items(config, raw_item_id, limit, explain).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No recommendations.");
        return Ok(());
    }

    for (i, rec) in results.iter().enumerate() {
        println!("{}", format_line(i + 1, rec));
        if let Some(ref ex) = rec.explain {
            println!(
                "    scoring: correlation={:.3}  support={}  → score={:.3}",
                ex.correlation, ex.support, rec.score
            );
        }
    }

    Ok(())
}

/// `"1. Jumanji (1995) (Similarity Score: 3.00)"`
pub fn format_line(rank: usize, rec: &Recommendation) -> String {
    format!("{}. {} (Similarity Score: {:.2})", rank, rec.title, rec.score)
}
