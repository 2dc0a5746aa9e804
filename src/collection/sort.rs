//! Collection sort orders
//!
//! All orders are stable: products that compare equal keep their input
//! order, and `Manual` returns the input unchanged.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use super::product::Product;

/// Storefront sort options, named by their `sort_by` handles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Manual,
    CreatedDescending,
    PriceAscending,
    PriceDescending,
    BestSelling,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Manual,
        SortKey::CreatedDescending,
        SortKey::PriceAscending,
        SortKey::PriceDescending,
        SortKey::BestSelling,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Manual => "manual",
            SortKey::CreatedDescending => "created-descending",
            SortKey::PriceAscending => "price-ascending",
            SortKey::PriceDescending => "price-descending",
            SortKey::BestSelling => "best-selling",
        }
    }

    /// Compare two products under this order
    #[must_use]
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Manual => Ordering::Equal,
            SortKey::CreatedDescending => b.id.cmp(&a.id),
            SortKey::PriceAscending => a.price_min.cmp(&b.price_min),
            SortKey::PriceDescending => b.price_max.cmp(&a.price_max),
            SortKey::BestSelling => best_selling(a, b),
        }
    }
}

/// Ranked products first by rank; unranked after them, available first
fn best_selling(a: &Product, b: &Product) -> Ordering {
    match (a.sales_rank, b.sales_rank) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.available.cmp(&a.available),
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sort key '{s}'"))
    }
}

/// Products ordered by `key`
#[must_use]
pub fn sort(products: &[Product], key: SortKey) -> Vec<Product> {
    let mut sorted = products.to_vec();
    if key != SortKey::Manual {
        // slice::sort_by is stable
        sorted.sort_by(|a, b| key.compare(a, b));
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(id: u64, price_min: u64) -> Product {
        let mut product = Product::new(id, format!("P{id}"));
        product.price_min = price_min;
        product.price_max = price_min;
        product
    }

    fn ids(products: &[Product]) -> Vec<u64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_price_ascending_is_stable() {
        let products = vec![priced(1, 999), priced(2, 2999), priced(3, 999)];
        assert_eq!(ids(&sort(&products, SortKey::PriceAscending)), vec![1, 3, 2]);
    }

    #[test]
    fn test_price_descending_uses_max() {
        let mut a = priced(1, 500);
        a.price_max = 5000;
        let b = priced(2, 3000);
        assert_eq!(ids(&sort(&[b, a], SortKey::PriceDescending)), vec![1, 2]);
    }

    #[test]
    fn test_created_descending() {
        let products = vec![priced(2, 0), priced(9, 0), priced(5, 0)];
        assert_eq!(ids(&sort(&products, SortKey::CreatedDescending)), vec![9, 5, 2]);
    }

    #[test]
    fn test_manual_is_identity() {
        let products = vec![priced(3, 1), priced(1, 2), priced(2, 3)];
        assert_eq!(sort(&products, SortKey::Manual), products);
    }

    #[test]
    fn test_best_selling_mixed_ranks() {
        let mut products: Vec<Product> = (1..=5).map(|id| priced(id, 0)).collect();
        products[0].sales_rank = None;
        products[0].available = false;
        products[1].sales_rank = Some(2);
        products[2].sales_rank = None;
        products[3].sales_rank = Some(1);
        products[4].sales_rank = None;
        assert_eq!(ids(&sort(&products, SortKey::BestSelling)), vec![4, 2, 3, 5, 1]);
    }

    #[test]
    fn test_parse_handles() {
        assert_eq!("best-selling".parse::<SortKey>(), Ok(SortKey::BestSelling));
        assert_eq!(" Price-Ascending ".parse::<SortKey>(), Ok(SortKey::PriceAscending));
        assert!("title-ascending".parse::<SortKey>().is_err());
    }
}
