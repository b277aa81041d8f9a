//! Pearson item-item similarity over co-raters.
//!
//! # Algorithm
//!
//! 1. Fetch the `(rating_a, rating_b)` pairs of users who rated both items.
//!    No pairs → `(0, 0)`.
//! 2. Compute the mean of each side.
//! 3. `numerator = Σ (aᵢ − ā)(bᵢ − b̄)`, `denom_a = Σ (aᵢ − ā)²`,
//!    `denom_b = Σ (bᵢ − b̄)²`.
//! 4. All co-ratings identical on either side (zero variance) →
//!    `(0, support)`.
//! 5. Otherwise `numerator / (sqrt(denom_a) · sqrt(denom_b))`, clamped to
//!    `[-1, 1]`.
//!
//! Every term is symmetric in `a` and `b`, and [`RatingStore::co_raters`]
//! returns pairs in user order, so `similarity(a, b) == similarity(b, a)`
//! bit for bit.

use crate::models::{ItemId, Similarity};
use crate::store::RatingStore;

/// Similarity between two items in `store`. Computed fresh on every call.
pub fn similarity<S: RatingStore + ?Sized>(
    store: &S,
    item_a: ItemId,
    item_b: ItemId,
) -> Similarity {
    pearson(&store.co_raters(item_a, item_b))
}

/// Pearson correlation of paired ratings, with the number of pairs as support.
pub fn pearson(pairs: &[(f64, f64)]) -> Similarity {
    if pairs.is_empty() {
        return Similarity::NONE;
    }

    let support = pairs.len();
    let n = support as f64;
    let mean_a = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denom_a = 0.0;
    let mut denom_b = 0.0;
    for (a, b) in pairs {
        let da = a - mean_a;
        let db = b - mean_b;
        numerator += da * db;
        denom_a += da * da;
        denom_b += db * db;
    }

    if is_constant(pairs.iter().map(|&(a, _)| a))
        || is_constant(pairs.iter().map(|&(_, b)| b))
        || denom_a == 0.0
        || denom_b == 0.0
    {
        return Similarity {
            correlation: 0.0,
            support,
        };
    }

    let correlation = (numerator / (denom_a.sqrt() * denom_b.sqrt())).clamp(-1.0, 1.0);

    Similarity {
        correlation,
        support,
    }
}

/// True when every value equals the first. The float mean of identical
/// values can drift, so this is checked on the inputs, not the deviations.
fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}
