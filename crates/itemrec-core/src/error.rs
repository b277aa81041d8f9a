//! Error taxonomy for the core.
//!
//! Arithmetic degeneracies (no co-raters, zero variance) are not errors and
//! never show up here; they collapse to a neutral similarity of `0`.

use thiserror::Error;

use crate::models::ItemId;

/// Errors raised by core operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecError {
    /// Caller input could not be interpreted (e.g. an item id that is not a
    /// positive integer).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The catalog has no entry for this item.
    #[error("item not found in catalog: {0}")]
    NotFound(ItemId),
}
