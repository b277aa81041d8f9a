//! Core data models used throughout itemrec.
//!
//! Ratings and items are reference data loaded once and never mutated.
//! Similarities, scored items, and recommendations are computed per query.

use serde::{Deserialize, Serialize};

/// User identifier as it appears in the rating data.
pub type UserId = i64;

/// Item identifier shared by ratings and the catalog.
pub type ItemId = i64;

/// A single (user, item, value) observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub value: f64,
    /// Unix timestamp (seconds) at which the rating was recorded.
    pub timestamp: i64,
}

/// Catalog entry for an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub title: String,
    pub genres: Vec<String>,
}

impl Item {
    /// Build an item from a pipe-separated genre list (`"Action|Comedy"`).
    ///
    /// The MovieLens placeholder `(no genres listed)` yields no genres.
    pub fn with_genre_list(item_id: ItemId, title: impl Into<String>, genres: &str) -> Self {
        Self {
            item_id,
            title: title.into(),
            genres: parse_genres(genres),
        }
    }

    /// Genres joined back into their pipe-separated storage form.
    pub fn genre_list(&self) -> String {
        self.genres.join("|")
    }
}

fn parse_genres(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != "(no genres listed)")
        .map(str::to_string)
        .collect()
}

/// Pearson correlation between two items plus the number of co-raters
/// backing it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Similarity {
    /// Correlation in `[-1.0, 1.0]`; `0.0` when there is no signal.
    pub correlation: f64,
    /// Number of users who rated both items.
    pub support: usize,
}

impl Similarity {
    /// The "no co-raters" result.
    pub const NONE: Similarity = Similarity {
        correlation: 0.0,
        support: 0,
    };

    /// Ranking score: correlation weighted by evidence volume.
    pub fn score(&self) -> f64 {
        self.correlation * self.support as f64
    }
}

/// A ranked candidate before title resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredItem {
    pub item_id: ItemId,
    pub score: f64,
    pub similarity: Similarity,
}

/// A recommendation ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub title: String,
    /// `correlation × support`; unrounded.
    pub score: f64,
    /// Scoring breakdown (populated when `explain` is requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<ScoreExplanation>,
}

/// Scoring breakdown for a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreExplanation {
    pub correlation: f64,
    pub support: usize,
}

impl From<Similarity> for ScoreExplanation {
    fn from(sim: Similarity) -> Self {
        Self {
            correlation: sim.correlation,
            support: sim.support,
        }
    }
}
