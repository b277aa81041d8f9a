//! # itemrec
//!
//! Item-based collaborative filtering over explicit ratings.
//!
//! Given a query item, itemrec ranks every other rated item by how strongly
//! users' ratings of the two agree (Pearson correlation over the users who
//! rated both) weighted by how many such users there are. Ratings and the
//! item catalog are imported from MovieLens-style CSV files into SQLite, or
//! read from the CSV files directly.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌─────────────────┐
//! │  CSV files  │──▶│   import    │──▶│     SQLite      │
//! │ ratings/... │   │  (upsert)   │   │ ratings + items │
//! └──────┬──────┘   └─────────────┘   └────────┬────────┘
//!        │            DataSource               │
//!        └──────────────────┬──────────────────┘
//!                           ▼
//!                  ┌─────────────────┐
//!                  │  InMemoryStore  │  itemrec-core
//!                  │ similarity/rank │
//!                  └────────┬────────┘
//!                ┌──────────┴──────────┐
//!                ▼                     ▼
//!           ┌──────────┐         ┌──────────┐
//!           │   CLI    │         │   HTTP   │
//!           │  (rec)   │         │  (axum)  │
//!           └──────────┘         └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! rec init                      # create database
//! rec import                    # load ratings.csv + movies.csv
//! rec recommend 1               # five items most similar to item 1
//! rec similarity 1 2 --json     # correlation and support for a pair
//! rec serve                     # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`ingest`] | CSV import into SQLite |
//! | [`progress`] | Import progress reporting |
//! | [`source`] | Data source trait and snapshot loading |
//! | [`source_sqlite`] | SQLite data source |
//! | [`source_csv`] | CSV data source |
//! | [`recommend`] | Top-N recommendations |
//! | [`similarity`] | Pairwise similarity lookup |
//! | [`stats`] | Dataset statistics |
//! | [`server`] | HTTP JSON server |
//!
//! The algorithms themselves live in [`itemrec_core`], re-exported here.

pub mod config;
pub mod db;
pub mod ingest;
pub mod migrate;
pub mod progress;
pub mod recommend;
pub mod server;
pub mod similarity;
pub mod source;
pub mod source_csv;
pub mod source_sqlite;
pub mod stats;

pub use itemrec_core;
