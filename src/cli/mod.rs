//! CLI definitions for the storefront-search command-line interface
//!
//! Three subcommands: `search` queries a store's suggest endpoint through the
//! orchestrator, `collection` filters and sorts a product JSON export, and
//! `sanitize` shows what the query sanitizer makes of some text.

pub mod display;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "storefront-search",
    about = "Storefront predictive search and collection filtering",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a store's products through /search/suggest.json
    Search {
        /// Search query
        query: String,

        /// Store root URL, e.g. https://shop.example.com
        #[arg(short, long)]
        store: String,

        /// Viewport width in CSS pixels (8 results at 768 or below, else 10)
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Directory for the persistent result cache and search history
        ///
        /// Without it, caching lasts only for this process.
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Request timeout in seconds
        #[arg(long, default_value = "8")]
        timeout: u64,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter and sort a product JSON file
    Collection {
        /// Path to a JSON array of products (or an object with `products`)
        file: PathBuf,

        /// Product types to include (repeatable)
        #[arg(long = "type")]
        product_type: Vec<String>,

        /// Variant sizes to include (repeatable)
        #[arg(long)]
        size: Vec<String>,

        /// Variant colors to include (repeatable)
        #[arg(long)]
        color: Vec<String>,

        /// Tags to include (repeatable)
        #[arg(long)]
        tag: Vec<String>,

        /// Only products that can be bought
        #[arg(long)]
        available: bool,

        /// Storefront URL parameters, e.g. "filter.p.tag=sale&sort_by=price-ascending"
        #[arg(long)]
        params: Option<String>,

        /// manual, created-descending, price-ascending, price-descending, best-selling
        #[arg(long)]
        sort: Option<String>,

        /// Also print per-facet value counts
        #[arg(long)]
        counts: bool,
    },

    /// Show how a raw query would be sanitized
    Sanitize {
        /// Raw query text
        text: String,
    },
}
