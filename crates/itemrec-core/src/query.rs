//! Caller-facing query parsing.
//!
//! Front-ends (CLI arguments, HTTP bodies) hand item ids over as text or
//! loosely-typed numbers; this is where they become an [`ItemId`] or a
//! [`RecError::InvalidInput`].

use crate::error::RecError;
use crate::models::ItemId;

/// Number of recommendations returned when the caller does not ask for a
/// specific count.
pub const DEFAULT_TOP_N: usize = 5;

/// A single recommendation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendQuery {
    pub item_id: ItemId,
    pub top_n: usize,
    /// Attach a [`ScoreExplanation`](crate::models::ScoreExplanation) to each result.
    pub explain: bool,
}

impl RecommendQuery {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            top_n: DEFAULT_TOP_N,
            explain: false,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }
}

/// Parse a user-supplied item id. Must be a positive integer.
pub fn parse_item_id(raw: &str) -> Result<ItemId, RecError> {
    let trimmed = raw.trim();
    let id: ItemId = trimmed.parse().map_err(|_| {
        RecError::InvalidInput(format!("item id must be an integer, got '{}'", trimmed))
    })?;
    if id <= 0 {
        return Err(RecError::InvalidInput(format!(
            "item id must be positive, got {}",
            id
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse_item_id("42"), Ok(42));
        assert_eq!(parse_item_id("  7\n"), Ok(7));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "abc", "4.5", "1e3", "12abc"] {
            assert!(
                matches!(parse_item_id(raw), Err(RecError::InvalidInput(_))),
                "expected InvalidInput for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        assert!(matches!(parse_item_id("0"), Err(RecError::InvalidInput(_))));
        assert!(matches!(parse_item_id("-3"), Err(RecError::InvalidInput(_))));
    }

    #[test]
    fn test_query_defaults() {
        let q = RecommendQuery::new(3);
        assert_eq!(q.top_n, DEFAULT_TOP_N);
        assert!(!q.explain);
        let q = q.with_top_n(10).with_explain(true);
        assert_eq!(q.top_n, 10);
        assert!(q.explain);
    }
}
