//! Pairwise item similarity lookup (`rec similarity <a> <b>`).

use anyhow::Result;
use serde::Serialize;

use itemrec_core::models::{ItemId, Similarity};
use itemrec_core::query::parse_item_id;
use itemrec_core::similarity::similarity;
use itemrec_core::store::memory::InMemoryStore;

use crate::config::Config;
use crate::source;

/// Similarity between two items, as returned by the CLI and HTTP server.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityResponse {
    pub a: ItemId,
    pub b: ItemId,
    pub correlation: f64,
    pub support: usize,
    /// `correlation × support`, the value used for ranking.
    pub score: f64,
}

impl SimilarityResponse {
    pub fn new(a: ItemId, b: ItemId, sim: Similarity) -> Self {
        Self {
            a,
            b,
            correlation: sim.correlation,
            support: sim.support,
            score: sim.score(),
        }
    }
}

/// Compute the similarity of two items in a loaded snapshot.
pub fn similarity_from_store(store: &InMemoryStore, a: ItemId, b: ItemId) -> SimilarityResponse {
    SimilarityResponse::new(a, b, similarity(store, a, b))
}

/// CLI entry point for `rec similarity <a> <b>`.
pub async fn run_similarity(config: &Config, raw_a: &str, raw_b: &str, json: bool) -> Result<()> {
    let a = parse_item_id(raw_a)?;
    let b = parse_item_id(raw_b)?;

    let store = source::load_store(config).await?;
    let resp = similarity_from_store(&store, a, b);

    if json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
    } else {
        println!("items:       {} / {}", resp.a, resp.b);
        println!("correlation: {:.4}", resp.correlation);
        println!("support:     {}", resp.support);
        println!("score:       {:.4}", resp.score);
    }

    Ok(())
}
