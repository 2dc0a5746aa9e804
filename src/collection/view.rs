//! A collection page's combined filter and sort selection

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::filter::{FilterState, filter};
use super::product::Product;
use super::sort::{SortKey, sort};

/// URL parameter carrying the sort handle
pub const SORT_PARAM: &str = "sort_by";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionView {
    pub filter_state: FilterState,
    pub sort_key: SortKey,
}

impl CollectionView {
    #[must_use]
    pub fn new(filter_state: FilterState, sort_key: SortKey) -> Self {
        Self {
            filter_state,
            sort_key,
        }
    }

    /// Filter, then sort
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        sort(&filter(products, &self.filter_state), self.sort_key)
    }

    /// Encode filters and sort as URL parameters; `manual` is left implicit
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(self.filter_state.to_query_pairs());
        if self.sort_key != SortKey::Manual {
            serializer.append_pair(SORT_PARAM, self.sort_key.as_str());
        }
        serializer.finish()
    }

    /// Decode URL parameters; an unknown sort handle falls back to `manual`
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let sort_key = form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .find(|(key, _)| key == SORT_PARAM)
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or_default();
        Self {
            filter_state: FilterState::from_query_string(query),
            sort_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Facet;

    #[test]
    fn test_query_round_trip() {
        let mut state = FilterState::new();
        state.add_filter(Facet::Color, "Navy Blue");
        let view = CollectionView::new(state, SortKey::PriceDescending);

        let query = view.to_query_string();
        assert!(query.ends_with("sort_by=price-descending"));
        assert_eq!(CollectionView::from_query_string(&query), view);
    }

    #[test]
    fn test_unknown_sort_falls_back() {
        let view = CollectionView::from_query_string("sort_by=alphabetical");
        assert_eq!(view.sort_key, SortKey::Manual);
        assert!(view.to_query_string().is_empty());
    }
}
