//! Data sources that materialize the rating snapshot.
//!
//! The core consumes a finite in-memory [`Dataset`]. Where that dataset
//! comes from is decided here: a [`DataSource`] loads it once, and
//! [`load_store`] turns it into the immutable [`InMemoryStore`] every
//! query runs against.
//!
//! | Source | Module | Reads |
//! |--------|--------|-------|
//! | `sqlite` | [`source_sqlite`](crate::source_sqlite) | `ratings` and `items` tables |
//! | `csv` | [`source_csv`](crate::source_csv) | MovieLens-style CSV files |
//!
//! Custom sources (an HTTP API, another database) implement the trait and
//! are passed to [`load_store_from`].

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use itemrec_core::store::memory::InMemoryStore;
use itemrec_core::store::Dataset;

use crate::config::Config;
use crate::source_csv::CsvSource;
use crate::source_sqlite::SqliteSource;

/// A loader that produces the complete rating and catalog snapshot.
///
/// # Example
///
/// ```rust
/// use anyhow::Result;
/// use async_trait::async_trait;
/// use itemrec::source::DataSource;
/// use itemrec_core::store::Dataset;
///
/// struct Fixed(Dataset);
///
/// #[async_trait]
/// impl DataSource for Fixed {
///     fn name(&self) -> &str { "fixed" }
///     async fn load(&self) -> Result<Dataset> { Ok(self.0.clone()) }
/// }
/// ```
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short label used in logs and `rec stats` (e.g. `"sqlite"`).
    fn name(&self) -> &str;

    /// Load every rating and catalog item.
    async fn load(&self) -> Result<Dataset>;
}

/// Build the data source selected by `[data].source`.
pub fn open_source(config: &Config) -> Box<dyn DataSource> {
    if config.data.is_csv() {
        Box::new(CsvSource::new(
            config.data.ratings_csv.clone(),
            config.data.items_csv.clone(),
        ))
    } else {
        Box::new(SqliteSource::new(config.clone()))
    }
}

/// Load the configured source into an in-memory snapshot.
pub async fn load_store(config: &Config) -> Result<InMemoryStore> {
    let source = open_source(config);
    load_store_from(source.as_ref()).await
}

/// Load an arbitrary source into an in-memory snapshot.
pub async fn load_store_from(source: &dyn DataSource) -> Result<InMemoryStore> {
    let dataset = source.load().await?;
    info!(
        source = source.name(),
        ratings = dataset.ratings.len(),
        items = dataset.items.len(),
        "loaded rating snapshot"
    );
    Ok(InMemoryStore::from_dataset(dataset))
}
