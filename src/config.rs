//! Configuration parsing and validation.
//!
//! itemrec is configured via a TOML file (default: `config/rec.toml`).
//!
//! # Example
//!
//! ```toml
//! [db]
//! path = "./data/rec.sqlite"
//!
//! [data]
//! source = "sqlite"            # or "csv" to read the files directly
//! ratings_csv = "./data/ratings.csv"
//! items_csv = "./data/movies.csv"
//!
//! [recommend]
//! default_top_n = 5
//!
//! [server]
//! bind = "127.0.0.1:7341"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use itemrec_core::query::DEFAULT_TOP_N;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

/// Where the rating snapshot is loaded from, and where `rec import` reads.
#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_ratings_csv")]
    pub ratings_csv: PathBuf,
    #[serde(default = "default_items_csv")]
    pub items_csv: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            ratings_csv: default_ratings_csv(),
            items_csv: default_items_csv(),
        }
    }
}

fn default_source() -> String {
    "sqlite".to_string()
}
fn default_ratings_csv() -> PathBuf {
    PathBuf::from("ratings.csv")
}
fn default_items_csv() -> PathBuf {
    PathBuf::from("movies.csv")
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommendConfig {
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            default_top_n: DEFAULT_TOP_N,
        }
    }
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

impl DataConfig {
    pub fn is_csv(&self) -> bool {
        self.source == "csv"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

/// Parse and validate a config from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.recommend.default_top_n == 0 {
        anyhow::bail!("recommend.default_top_n must be >= 1");
    }

    match config.data.source.as_str() {
        "sqlite" | "csv" => {}
        other => anyhow::bail!(
            "Unknown data source: '{}'. Must be sqlite or csv.",
            other
        ),
    }

    Ok(config)
}
