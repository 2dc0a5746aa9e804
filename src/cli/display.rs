//! Terminal output for CLI results

use std::collections::BTreeMap;

use storefront_search::collection::{Facet, Product};
use storefront_search::search::{ProductSummary, SearchOutcome};

/// Format cents as a decimal amount
#[must_use]
pub fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

pub fn print_outcome(outcome: &SearchOutcome) {
    match outcome {
        SearchOutcome::Results {
            query,
            products,
            from_cache,
        } => {
            let source = if *from_cache { " (cached)" } else { "" };
            println!("{} results for \"{query}\"{source}", products.len());
            println!();
            for (rank, product) in products.iter().enumerate() {
                print_summary(rank + 1, product);
            }
        }
        SearchOutcome::Empty { query } => println!("No results for \"{query}\""),
        SearchOutcome::Invalid { reason, message } => println!("{message} ({reason})"),
        SearchOutcome::Failed { error, message, .. } => {
            println!("{message}");
            println!("  {error}");
            if error.is_retryable() {
                println!("  This error is retryable.");
            } else if let Some(wait) = error.retry_after() {
                println!("  Retry after {}s.", wait.as_secs());
            }
        }
        SearchOutcome::Superseded { query } => println!("Search for \"{query}\" was cancelled"),
    }
}

fn print_summary(rank: usize, product: &ProductSummary) {
    let stock = if product.available { "" } else { " [sold out]" };
    let price = if product.price.is_empty() {
        String::new()
    } else {
        format!("  {}", product.price)
    };
    println!("{rank:>3}. {}{price}{stock}", product.title);
    println!("     {}", product.url);
}

pub fn print_products(products: &[Product]) {
    for product in products {
        let price = if product.price_min == product.price_max {
            format_cents(product.price_min)
        } else {
            format!(
                "{} - {}",
                format_cents(product.price_min),
                format_cents(product.price_max)
            )
        };
        let stock = if product.available { "" } else { " [sold out]" };
        println!("{:>8}  {}  {price}{stock}", product.id, product.title);
    }
}

pub fn print_counts(counts: &BTreeMap<Facet, BTreeMap<String, usize>>) {
    for (facet, values) in counts {
        println!("{facet}:");
        for (value, count) in values {
            println!("  {value} ({count})");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(999), "9.99");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(120_000), "1200.00");
    }
}
