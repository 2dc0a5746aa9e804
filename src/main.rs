// storefront-search: predictive search and collection filtering from the terminal

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use storefront_search::cache::{FileStore, KeyValueStore, MemoryStore};
use storefront_search::collection::{
    CollectionView, Facet, IN_STOCK, SortKey, facet_counts, parse_products,
};
use storefront_search::config::SearchConfig;
use storefront_search::sanitizer::sanitize;
use storefront_search::search::{SearchOrchestrator, SearchOutcome};

mod cli;
use cli::{Cli, Commands, display};

const STORE_FILE: &str = "storefront-search.json";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            store,
            width,
            cache_dir,
            timeout,
            json,
        } => run_search(&query, &store, width, cache_dir.as_deref(), timeout, json).await,
        Commands::Collection {
            file,
            product_type,
            size,
            color,
            tag,
            available,
            params,
            sort,
            counts,
        } => {
            let mut view = params
                .as_deref()
                .map(CollectionView::from_query_string)
                .unwrap_or_default();
            for (facet, values) in [
                (Facet::Type, product_type),
                (Facet::Size, size),
                (Facet::Color, color),
                (Facet::Tag, tag),
            ] {
                for value in values {
                    view.filter_state.add_filter(facet, value);
                }
            }
            if available {
                view.filter_state.add_filter(Facet::Availability, IN_STOCK);
            }
            if let Some(sort) = sort {
                view.sort_key = sort
                    .parse::<SortKey>()
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
            }
            run_collection(&file, &view, counts)
        }
        Commands::Sanitize { text } => {
            let result = sanitize(&text);
            if result.valid {
                println!("valid: \"{}\"", result.sanitized);
            } else if let Some(reason) = result.reason {
                println!("rejected ({reason}): {}", reason.user_message());
            }
            Ok(())
        }
    }
}

async fn run_search(
    query: &str,
    store_url: &str,
    width: u32,
    cache_dir: Option<&Path>,
    timeout: u64,
    json: bool,
) -> Result<()> {
    let config = SearchConfig::builder()
        .base_url(store_url)
        .viewport_width(width)
        .request_timeout(Duration::from_secs(timeout))
        .build()
        .context("Invalid search configuration")?;

    let store: Arc<dyn KeyValueStore> = match cache_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
            let path: PathBuf = dir.join(STORE_FILE);
            Arc::new(FileStore::open(&path).with_context(|| format!("Failed to open {}", path.display()))?)
        }
        None => Arc::new(MemoryStore::new()),
    };

    let orchestrator = SearchOrchestrator::http(config, store)?;
    info!(store = %orchestrator.config().base_url(), query, "Searching");

    let outcome = orchestrator.search(query).await;
    if json {
        println!("{}", serde_json::to_string_pretty(outcome.products())?);
    } else {
        display::print_outcome(&outcome);
    }

    let recent = orchestrator.recent_searches();
    if !json && recent.len() > 1 {
        println!();
        println!("Recent searches: {}", recent.join(", "));
    }

    match outcome {
        SearchOutcome::Failed { error, .. } => bail!(error),
        SearchOutcome::Invalid { reason, .. } => bail!("Query rejected: {reason}"),
        _ => Ok(()),
    }
}

fn run_collection(file: &Path, view: &CollectionView, counts: bool) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let parsed = parse_products(&json).context("Product file is not valid JSON")?;
    for skipped in &parsed.skipped {
        tracing::warn!(index = skipped.index, reason = %skipped.reason, "Skipped product record");
    }

    let products = view.apply(&parsed.products);
    info!(
        total = parsed.products.len(),
        shown = products.len(),
        filters = view.filter_state.active_count(),
        sort = %view.sort_key,
        "Applied collection view"
    );
    display::print_products(&products);

    if counts {
        println!();
        display::print_counts(&facet_counts(&parsed.products, &view.filter_state));
    }

    let query = view.to_query_string();
    if !query.is_empty() {
        println!();
        println!("?{query}");
    }
    Ok(())
}
