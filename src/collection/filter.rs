//! Facet selections and the product filter
//!
//! Values are ORed within a facet and facets are ANDed together. Facets with
//! no selected values impose no constraint. Comparisons ignore case and
//! surrounding whitespace.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use url::form_urlencoded;

use super::facets::{Facet, IN_STOCK, OUT_OF_STOCK};
use super::product::Product;
use crate::utils::fold_key;

/// Current facet selections for one collection view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    selections: BTreeMap<Facet, BTreeSet<String>>,
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `value` for `facet`. Returns false if it was already selected.
    pub fn add_filter(&mut self, facet: Facet, value: impl AsRef<str>) -> bool {
        let value = value.as_ref().trim();
        if value.is_empty() || self.contains(facet, value) {
            return false;
        }
        self.selections
            .entry(facet)
            .or_default()
            .insert(value.to_string())
    }

    /// Deselect `value` for `facet`. Returns false if it was not selected.
    pub fn remove_filter(&mut self, facet: Facet, value: impl AsRef<str>) -> bool {
        let folded = fold_key(value.as_ref());
        let Some(values) = self.selections.get_mut(&facet) else {
            return false;
        };
        let before = values.len();
        values.retain(|existing| fold_key(existing) != folded);
        let removed = values.len() != before;
        if values.is_empty() {
            self.selections.remove(&facet);
        }
        removed
    }

    /// Toggle `value`, returning whether it is now selected
    pub fn toggle(&mut self, facet: Facet, value: impl AsRef<str>) -> bool {
        let value = value.as_ref();
        if self.remove_filter(facet, value) {
            false
        } else {
            self.add_filter(facet, value)
        }
    }

    pub fn clear_facet(&mut self, facet: Facet) {
        self.selections.remove(&facet);
    }

    pub fn clear_all(&mut self) {
        self.selections.clear();
    }

    #[must_use]
    pub fn contains(&self, facet: Facet, value: &str) -> bool {
        let folded = fold_key(value);
        self.selections
            .get(&facet)
            .is_some_and(|values| values.iter().any(|v| fold_key(v) == folded))
    }

    #[must_use]
    pub fn values(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.selections.get(&facet)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.values().all(BTreeSet::is_empty)
    }

    /// Number of selected values across all facets
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.selections.values().map(BTreeSet::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Facet, &BTreeSet<String>)> {
        self.selections.iter().map(|(facet, values)| (*facet, values))
    }

    /// Whether `product` satisfies every active facet
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.selections.iter().all(|(facet, selected)| {
            if selected.is_empty() {
                return true;
            }
            let selected: BTreeSet<String> = selected.iter().map(|v| fold_key(v)).collect();
            facet
                .values(product)
                .into_iter()
                .any(|value| selected.contains(&fold_key(value)))
        })
    }

    /// Encode as storefront URL parameters (`filter.p.product_type=Shirt&...`)
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for (facet, values) in &self.selections {
            for value in values {
                let encoded = match (facet, fold_key(value).as_str()) {
                    (Facet::Availability, IN_STOCK) => "1".to_string(),
                    (Facet::Availability, OUT_OF_STOCK) => "0".to_string(),
                    _ => value.clone(),
                };
                pairs.push((facet.param_name(), encoded));
            }
        }
        pairs
    }

    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }

    /// Decode storefront URL parameters; unknown parameters are ignored
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let mut state = Self::new();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let Some(facet) = Facet::from_param_name(&key) else {
                continue;
            };
            let value = match (facet, value.trim()) {
                (Facet::Availability, "1") => IN_STOCK.to_string(),
                (Facet::Availability, "0") => OUT_OF_STOCK.to_string(),
                (_, other) => other.to_string(),
            };
            state.add_filter(facet, value);
        }
        state
    }
}

/// Products matching every active facet, in input order
#[must_use]
pub fn filter(products: &[Product], state: &FilterState) -> Vec<Product> {
    if state.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|product| state.matches(product))
        .cloned()
        .collect()
}
