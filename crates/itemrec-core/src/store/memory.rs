//! In-memory snapshot implementing [`RatingStore`] and [`Catalog`].
//!
//! Ratings are indexed per item as `BTreeMap<UserId, f64>`, which makes
//! co-rater lookup a sorted merge join and keeps pair order independent of
//! argument order. Duplicate (user, item) ratings resolve last-write-wins.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{Item, ItemId, Rating, UserId};

use super::{Catalog, Dataset, RatingStore};

/// Immutable rating and catalog snapshot.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    by_item: HashMap<ItemId, BTreeMap<UserId, f64>>,
    /// Distinct rated items in first-seen order.
    item_order: Vec<ItemId>,
    catalog: HashMap<ItemId, Item>,
    user_count: usize,
}

impl InMemoryStore {
    pub fn new(
        ratings: impl IntoIterator<Item = Rating>,
        items: impl IntoIterator<Item = Item>,
    ) -> Self {
        let mut by_item: HashMap<ItemId, BTreeMap<UserId, f64>> = HashMap::new();
        let mut item_order = Vec::new();
        let mut users = HashSet::new();

        for rating in ratings {
            users.insert(rating.user_id);
            let raters = by_item.entry(rating.item_id).or_insert_with(|| {
                item_order.push(rating.item_id);
                BTreeMap::new()
            });
            raters.insert(rating.user_id, rating.value);
        }

        let catalog = items.into_iter().map(|item| (item.item_id, item)).collect();

        Self {
            by_item,
            item_order,
            catalog,
            user_count: users.len(),
        }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::new(dataset.ratings, dataset.items)
    }

    /// Number of distinct users with at least one rating.
    pub fn user_count(&self) -> usize {
        self.user_count
    }

    /// Distinct rated items in first-seen order.
    pub fn rated_items(&self) -> &[ItemId] {
        &self.item_order
    }

    /// Number of distinct rated items.
    pub fn rated_item_count(&self) -> usize {
        self.item_order.len()
    }

    /// Rated items with no catalog entry, in first-seen order.
    pub fn items_missing_from_catalog(&self) -> Vec<ItemId> {
        self.item_order
            .iter()
            .copied()
            .filter(|id| !self.catalog.contains_key(id))
            .collect()
    }
}

impl RatingStore for InMemoryStore {
    fn co_raters(&self, item_a: ItemId, item_b: ItemId) -> Vec<(f64, f64)> {
        let (Some(raters_a), Some(raters_b)) =
            (self.by_item.get(&item_a), self.by_item.get(&item_b))
        else {
            return Vec::new();
        };

        let mut pairs = Vec::with_capacity(raters_a.len().min(raters_b.len()));
        let mut left = raters_a.iter().peekable();
        let mut right = raters_b.iter().peekable();

        while let (Some(&(user_a, rating_a)), Some(&(user_b, rating_b))) =
            (left.peek(), right.peek())
        {
            match user_a.cmp(user_b) {
                std::cmp::Ordering::Less => {
                    left.next();
                }
                std::cmp::Ordering::Greater => {
                    right.next();
                }
                std::cmp::Ordering::Equal => {
                    pairs.push((*rating_a, *rating_b));
                    left.next();
                    right.next();
                }
            }
        }

        pairs
    }

    fn candidate_items(&self, exclude: ItemId) -> Vec<ItemId> {
        self.item_order
            .iter()
            .copied()
            .filter(|&id| id != exclude)
            .collect()
    }

    fn raters_of(&self, item: ItemId) -> usize {
        self.by_item.get(&item).map_or(0, BTreeMap::len)
    }

    fn rating_count(&self) -> usize {
        self.by_item.values().map(BTreeMap::len).sum()
    }
}

impl Catalog for InMemoryStore {
    fn item(&self, item_id: ItemId) -> Option<&Item> {
        self.catalog.get(&item_id)
    }

    fn item_count(&self) -> usize {
        self.catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecError;

    fn rating(user_id: UserId, item_id: ItemId, value: f64) -> Rating {
        Rating {
            user_id,
            item_id,
            value,
            timestamp: 0,
        }
    }

    fn sample() -> InMemoryStore {
        InMemoryStore::new(
            vec![
                rating(1, 10, 5.0),
                rating(1, 20, 4.0),
                rating(2, 10, 3.0),
                rating(3, 20, 2.0),
                rating(3, 10, 1.0),
                rating(4, 30, 4.5),
            ],
            vec![
                Item::with_genre_list(10, "Ten", "Drama"),
                Item::with_genre_list(20, "Twenty", "Comedy"),
            ],
        )
    }

    #[test]
    fn test_co_raters_overlap() {
        let store = sample();
        assert_eq!(store.co_raters(10, 20), vec![(5.0, 4.0), (1.0, 2.0)]);
    }

    #[test]
    fn test_co_raters_swapped_arguments_swap_pairs() {
        let store = sample();
        let forward = store.co_raters(10, 20);
        let backward: Vec<(f64, f64)> = store
            .co_raters(20, 10)
            .into_iter()
            .map(|(a, b)| (b, a))
            .collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_co_raters_no_overlap_is_empty() {
        let store = sample();
        assert!(store.co_raters(10, 30).is_empty());
        assert!(store.co_raters(10, 999).is_empty());
        assert!(store.co_raters(998, 999).is_empty());
    }

    #[test]
    fn test_candidates_exclude_query_in_first_seen_order() {
        let store = sample();
        assert_eq!(store.candidate_items(10), vec![20, 30]);
        assert_eq!(store.candidate_items(20), vec![10, 30]);
        assert_eq!(store.candidate_items(42), vec![10, 20, 30]);
    }

    #[test]
    fn test_duplicate_rating_last_write_wins() {
        let store = InMemoryStore::new(
            vec![rating(1, 10, 1.0), rating(1, 20, 3.0), rating(1, 10, 4.0)],
            Vec::new(),
        );
        assert_eq!(store.co_raters(10, 20), vec![(4.0, 3.0)]);
        assert_eq!(store.rating_count(), 2);
        assert_eq!(store.raters_of(10), 1);
    }

    #[test]
    fn test_counts() {
        let store = sample();
        assert_eq!(store.user_count(), 4);
        assert_eq!(store.rated_item_count(), 3);
        assert_eq!(store.rating_count(), 6);
        assert_eq!(store.raters_of(10), 3);
        assert_eq!(store.raters_of(77), 0);
        assert_eq!(store.item_count(), 2);
    }

    #[test]
    fn test_catalog_lookup() {
        let store = sample();
        assert_eq!(store.title_of(10), Ok("Ten"));
        assert_eq!(store.title_of(30), Err(RecError::NotFound(30)));
        assert_eq!(store.items_missing_from_catalog(), vec![30]);
    }

    #[test]
    fn test_rated_items_includes_every_id() {
        let store = InMemoryStore::new(
            vec![rating(1, 0, 3.0), rating(1, 10, 4.0), rating(2, 0, 2.0)],
            Vec::new(),
        );
        assert_eq!(store.rated_items(), &[0, 10]);
    }

    #[test]
    fn test_empty_store() {
        let store = InMemoryStore::default();
        assert!(store.candidate_items(1).is_empty());
        assert_eq!(store.rating_count(), 0);
        assert_eq!(store.user_count(), 0);
    }
}
