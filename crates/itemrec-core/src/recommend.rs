//! Item-based top-N recommendation.
//!
//! The ranking algorithm operates entirely through the [`RatingStore`]
//! trait. The calling application builds the store, constructs a
//! [`RecommendQuery`], and renders the results.
//!
//! # Scoring
//!
//! 1. Enumerate every rated item except the query item.
//! 2. For each candidate compute [`similarity`] against the query item;
//!    `score = correlation × support`.
//! 3. Stable sort by score (desc); ties keep candidate enumeration order.
//! 4. Truncate to `top_n`.
//!
//! There is no existence check on the query item: an unrated item simply
//! scores `0` against every candidate.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::models::{ItemId, Recommendation, ScoredItem};
use crate::query::RecommendQuery;
use crate::similarity::similarity;
use crate::store::{Catalog, RatingStore};

/// Ranks items by similarity to a query item.
///
/// Holds a borrowed store; every call rescans all candidates and recomputes
/// each similarity from scratch.
pub struct Recommender<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RatingStore + ?Sized> Recommender<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Top `top_n` candidates by score, best first.
    ///
    /// Non-positive query ids and `top_n == 0` return an empty list.
    pub fn recommend(&self, query: ItemId, top_n: usize) -> Vec<ScoredItem> {
        if top_n == 0 || query <= 0 {
            return Vec::new();
        }

        let mut scored: Vec<ScoredItem> = self
            .store
            .candidate_items(query)
            .into_iter()
            .map(|candidate| {
                let sim = similarity(self.store, query, candidate);
                ScoredItem {
                    item_id: candidate,
                    score: sim.score(),
                    similarity: sim,
                }
            })
            .collect();

        debug!(query, candidates = scored.len(), "scored candidates");

        rank(&mut scored);
        scored.truncate(top_n);
        scored
    }
}

impl<'a, S: RatingStore + Catalog + ?Sized> Recommender<'a, S> {
    /// Run `query` and resolve titles through the catalog.
    ///
    /// Candidates without a catalog entry are skipped with a warning rather
    /// than failing the whole request, so the result may hold fewer than
    /// `top_n` entries.
    pub fn recommend_titled(&self, query: &RecommendQuery) -> Vec<Recommendation> {
        self.recommend(query.item_id, query.top_n)
            .into_iter()
            .filter_map(|scored| match self.store.title_of(scored.item_id) {
                Ok(title) => Some(Recommendation {
                    item_id: scored.item_id,
                    title: title.to_string(),
                    score: scored.score,
                    explain: query.explain.then(|| scored.similarity.into()),
                }),
                Err(err) => {
                    warn!(
                        query = query.item_id,
                        item_id = scored.item_id,
                        error = %err,
                        "skipping recommendation without catalog entry"
                    );
                    None
                }
            })
            .collect()
    }
}

/// Stable descending sort by score.
pub fn rank(scored: &mut [ScoredItem]) {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}
