//! # itemrec core
//!
//! Pure, synchronous logic for itemrec: rating and catalog models, the
//! [`store::RatingStore`] and [`store::Catalog`] abstractions, Pearson
//! item-item similarity, and top-N ranking.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or other
//! native-only dependencies. Everything operates on an immutable
//! in-memory snapshot supplied by the calling application.

pub mod error;
pub mod models;
pub mod query;
pub mod recommend;
pub mod similarity;
pub mod store;

pub use error::RecError;
pub use models::{Item, ItemId, Rating, Recommendation, ScoredItem, Similarity, UserId};
