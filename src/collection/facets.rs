//! Filterable product attributes and facet value counts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::filter::{FilterState, filter};
use super::product::Product;
use crate::utils::fold_key;

/// Availability facet value for products that can be bought
pub const IN_STOCK: &str = "in-stock";

/// Availability facet value for sold-out products
pub const OUT_OF_STOCK: &str = "out-of-stock";

/// A filterable product attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Type,
    Size,
    Color,
    Tag,
    Availability,
}

impl Facet {
    pub const ALL: [Facet; 5] = [
        Facet::Type,
        Facet::Size,
        Facet::Color,
        Facet::Tag,
        Facet::Availability,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Type => "type",
            Facet::Size => "size",
            Facet::Color => "color",
            Facet::Tag => "tag",
            Facet::Availability => "availability",
        }
    }

    /// Storefront URL parameter carrying this facet
    #[must_use]
    pub fn param_name(self) -> &'static str {
        match self {
            Facet::Type => "filter.p.product_type",
            Facet::Size => "filter.v.option.size",
            Facet::Color => "filter.v.option.color",
            Facet::Tag => "filter.p.tag",
            Facet::Availability => "filter.v.availability",
        }
    }

    #[must_use]
    pub fn from_param_name(param: &str) -> Option<Facet> {
        Facet::ALL.into_iter().find(|facet| facet.param_name() == param)
    }

    /// Variant option names this facet reads, if it is option-backed
    fn option_names(self) -> &'static [&'static str] {
        match self {
            Facet::Size => &["size"],
            Facet::Color => &["color", "colour"],
            _ => &[],
        }
    }

    /// Every value `product` has for this facet (may repeat)
    #[must_use]
    pub fn values(self, product: &Product) -> Vec<&str> {
        match self {
            Facet::Type if product.product_type.is_empty() => Vec::new(),
            Facet::Type => vec![product.product_type.as_str()],
            Facet::Tag => product.tags.iter().map(String::as_str).collect(),
            Facet::Availability if product.available => vec![IN_STOCK],
            Facet::Availability => vec![OUT_OF_STOCK],
            Facet::Size | Facet::Color => self
                .option_names()
                .iter()
                .flat_map(|name| product.option_values(name))
                .collect(),
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "type" | "product_type" => Ok(Facet::Type),
            "size" => Ok(Facet::Size),
            "color" | "colour" => Ok(Facet::Color),
            "tag" | "tags" => Ok(Facet::Tag),
            "availability" | "available" => Ok(Facet::Availability),
            other => Err(format!("unknown facet '{other}'")),
        }
    }
}

/// Per facet, how many products each value would match
///
/// Counts for a facet are computed against every *other* active facet, so
/// selecting "Black" does not zero out the count for "White".
#[must_use]
pub fn facet_counts(products: &[Product], state: &FilterState) -> BTreeMap<Facet, BTreeMap<String, usize>> {
    let mut counts = BTreeMap::new();
    for facet in Facet::ALL {
        let mut others = state.clone();
        others.clear_facet(facet);
        let candidates = filter(products, &others);

        // Folded value -> (first-seen display form, count)
        let mut tally: BTreeMap<String, (String, usize)> = BTreeMap::new();
        for product in &candidates {
            let mut seen_here = std::collections::BTreeSet::new();
            for value in facet.values(product) {
                let folded = fold_key(value);
                if folded.is_empty() || !seen_here.insert(folded.clone()) {
                    continue;
                }
                tally
                    .entry(folded)
                    .or_insert_with(|| (value.trim().to_string(), 0))
                    .1 += 1;
            }
        }

        if !tally.is_empty() {
            counts.insert(facet, tally.into_values().collect());
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::product::Variant;

    fn shirt(id: u64, color: &str, size: &str, available: bool) -> Product {
        let mut product = Product::new(id, format!("Shirt {id}"));
        product.product_type = "Shirt".to_string();
        product.available = available;
        product.variants.push(Variant {
            id: id * 10,
            available,
            options_by_name: BTreeMap::from([
                ("Colour".to_string(), color.to_string()),
                ("Size".to_string(), size.to_string()),
            ]),
        });
        product
    }

    #[test]
    fn test_values_per_facet() {
        let product = shirt(1, "Black", "M", false);
        assert_eq!(Facet::Color.values(&product), vec!["Black"]);
        assert_eq!(Facet::Size.values(&product), vec!["M"]);
        assert_eq!(Facet::Availability.values(&product), vec![OUT_OF_STOCK]);
        assert!(Facet::Tag.values(&product).is_empty());
    }

    #[test]
    fn test_counts_ignore_own_facet() {
        let products = vec![
            shirt(1, "Black", "M", true),
            shirt(2, "White", "M", true),
            shirt(3, "black", "L", false),
        ];
        let mut state = FilterState::new();
        state.add_filter(Facet::Color, "Black");

        let counts = facet_counts(&products, &state);
        let colors = &counts[&Facet::Color];
        assert_eq!(colors.get("Black"), Some(&2));
        assert_eq!(colors.get("White"), Some(&1));

        // Size counts are narrowed by the color selection
        let sizes = &counts[&Facet::Size];
        assert_eq!(sizes.get("M"), Some(&1));
        assert_eq!(sizes.get("L"), Some(&1));
    }

    #[test]
    fn test_parse_facet_names() {
        assert_eq!("Colour".parse::<Facet>(), Ok(Facet::Color));
        assert_eq!("product_type".parse::<Facet>(), Ok(Facet::Type));
        assert!("price".parse::<Facet>().is_err());
        assert_eq!(
            Facet::from_param_name("filter.v.option.size"),
            Some(Facet::Size)
        );
    }
}
