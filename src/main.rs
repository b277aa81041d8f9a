//! # itemrec CLI (`rec`)
//!
//! The `rec` binary is the primary interface for itemrec. It provides
//! commands for database initialization, rating import, recommendations,
//! pairwise similarity, dataset statistics, and starting the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! rec --config ./config/rec.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rec init` | Create the SQLite database and run schema migrations |
//! | `rec import` | Import ratings and items from CSV |
//! | `rec stats` | Show dataset statistics |
//! | `rec recommend <id>` | Items most similar to `<id>` |
//! | `rec similarity <a> <b>` | Correlation and support for two items |
//! | `rec serve` | Start the HTTP server |
//!
//! Log verbosity is controlled with `RUST_LOG` (default `warn`); logs go to
//! stderr.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use itemrec::progress::ProgressMode;
use itemrec::{config, ingest, migrate, recommend, server, similarity, stats};

/// itemrec CLI: item-to-item recommendations from explicit ratings.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/rec.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "rec",
    about = "itemrec — item-based collaborative filtering over explicit ratings",
    version,
    long_about = "itemrec ranks items by how similarly users rated them: Pearson correlation \
    over shared raters, weighted by the number of shared raters. Ratings are imported from \
    MovieLens-style CSV files and served via a CLI and an HTTP JSON API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/rec.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the `ratings` and `items`
    /// tables. Running it multiple times is safe.
    Init,

    /// Import ratings and items from the CSV files named in `[data]`.
    ///
    /// Rows are upserted: a (user, item) pair that already exists takes
    /// the new value.
    Import {
        /// Delete all existing ratings and items first.
        #[arg(long)]
        replace: bool,

        /// Parse the files and report row counts without writing.
        #[arg(long)]
        dry_run: bool,

        /// Progress output on stderr. Defaults to `human` on a TTY, else `off`.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Show rating, user and catalog counts.
    Stats,

    /// Recommend the items most similar to ITEM_ID.
    Recommend {
        /// Query item id (positive integer).
        item_id: String,

        /// Number of results. Defaults to `[recommend].default_top_n`.
        #[arg(long)]
        limit: Option<usize>,

        /// Show correlation and support for each result.
        #[arg(long)]
        explain: bool,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the similarity between two items.
    Similarity {
        a: String,
        b: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP server on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import {
            replace,
            dry_run,
            progress,
        } => {
            let mode = progress.unwrap_or_else(ProgressMode::default_for_tty);
            ingest::run_import(&cfg, replace, dry_run, mode.reporter().as_ref()).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Recommend {
            item_id,
            limit,
            explain,
            json,
        } => {
            recommend::run_recommend(&cfg, &item_id, limit, explain, json).await?;
        }
        Commands::Similarity { a, b, json } => {
            similarity::run_similarity(&cfg, &a, &b, json).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
