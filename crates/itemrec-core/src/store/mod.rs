//! Storage abstraction for itemrec.
//!
//! The [`RatingStore`] trait answers the two questions the similarity and
//! ranking algorithms need ("which items exist" and "how did the users who
//! rated both of these items rate them"). The [`Catalog`] trait resolves
//! item ids to display data.
//!
//! Both are read-only. Implementations hold an immutable snapshot loaded
//! once at startup; see [`memory::InMemoryStore`].

pub mod memory;

use crate::error::RecError;
use crate::models::{Item, ItemId, Rating};

/// A fully materialized set of ratings and catalog items.
///
/// This is the hand-off point between an external loader (CSV files, a
/// database, an API) and the core.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub ratings: Vec<Rating>,
    pub items: Vec<Item>,
}

/// Read-only access to the user-item rating matrix.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`co_raters`](RatingStore::co_raters) | Paired ratings from users who rated both items |
/// | [`candidate_items`](RatingStore::candidate_items) | Every rated item except one |
/// | [`raters_of`](RatingStore::raters_of) | Number of users who rated an item |
/// | [`rating_count`](RatingStore::rating_count) | Number of distinct (user, item) ratings |
pub trait RatingStore {
    /// One `(rating_a, rating_b)` pair per user who rated both items.
    ///
    /// Pairs are ordered by ascending user id, so swapping the arguments
    /// swaps each pair and nothing else. Returns an empty vector when there
    /// is no overlap or either item is unknown.
    fn co_raters(&self, item_a: ItemId, item_b: ItemId) -> Vec<(f64, f64)>;

    /// All distinct rated items except `exclude`, in a stable order.
    fn candidate_items(&self, exclude: ItemId) -> Vec<ItemId>;

    /// Number of users who rated `item`.
    fn raters_of(&self, item: ItemId) -> usize;

    /// Number of distinct (user, item) ratings held.
    fn rating_count(&self) -> usize;
}

/// Item id → catalog entry lookup.
pub trait Catalog {
    /// Full catalog entry, if present.
    fn item(&self, item_id: ItemId) -> Option<&Item>;

    /// Number of catalog entries.
    fn item_count(&self) -> usize;

    /// Display title for an item.
    fn title_of(&self, item_id: ItemId) -> Result<&str, RecError> {
        self.item(item_id)
            .map(|item| item.title.as_str())
            .ok_or(RecError::NotFound(item_id))
    }
}
