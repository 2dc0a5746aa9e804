//! Suggest endpoint response normalization
//!
//! The hosted endpoint answers with
//! `{ "resources": { "results": { "products": [ ... ] } } }`. The product
//! list itself is required; every field inside a product degrades to a
//! placeholder on its own, so one odd record never blanks the dropdown.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SearchError, SearchResult};
use crate::utils::{DESKTOP_RESULT_LIMIT, MOBILE_BREAKPOINT_PX, MOBILE_RESULT_LIMIT};

/// Title shown for a product whose title is missing
pub const PLACEHOLDER_TITLE: &str = "Untitled product";

/// Link target for a product with neither url nor handle
pub const PLACEHOLDER_URL: &str = "#";

/// One product row in the search dropdown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: u64,
    pub title: String,
    pub handle: String,
    pub url: String,
    /// Display price exactly as the store formats it, e.g. `"29.99"`
    pub price: String,
    pub image: Option<String>,
    pub vendor: String,
    pub product_type: String,
    pub available: bool,
}

/// Number of products to request per suggest call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLimit(usize);

impl ResultLimit {
    /// 8 results up to the mobile breakpoint (768px inclusive), 10 above it
    #[must_use]
    pub fn for_viewport(width_px: u32) -> Self {
        if width_px <= MOBILE_BREAKPOINT_PX {
            Self(MOBILE_RESULT_LIMIT)
        } else {
            Self(DESKTOP_RESULT_LIMIT)
        }
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

fn string_field(product: &Value, key: &str) -> Option<String> {
    match product.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_field(product: &Value) -> u64 {
    match product.get("id") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        // Storefront GIDs look like gid://shopify/Product/123
        Some(Value::String(s)) => s
            .rsplit('/')
            .next()
            .and_then(|tail| tail.parse().ok())
            .unwrap_or(0),
        _ => 0,
    }
}

fn image_field(product: &Value) -> Option<String> {
    match product.get("featured_image").or_else(|| product.get("image"))? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map
            .get("url")
            .or_else(|| map.get("src"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// Build a summary from one raw product, substituting placeholders per field
#[must_use]
pub fn normalize_product(product: &Value) -> ProductSummary {
    let handle = string_field(product, "handle").unwrap_or_default();
    let url = string_field(product, "url").unwrap_or_else(|| {
        if handle.is_empty() {
            PLACEHOLDER_URL.to_string()
        } else {
            format!("/products/{handle}")
        }
    });

    ProductSummary {
        id: id_field(product),
        title: string_field(product, "title").unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
        handle,
        url,
        price: string_field(product, "price").unwrap_or_default(),
        image: image_field(product),
        vendor: string_field(product, "vendor").unwrap_or_default(),
        product_type: string_field(product, "type")
            .or_else(|| string_field(product, "product_type"))
            .unwrap_or_default(),
        // The endpoint only lists purchasable products unless told otherwise
        available: product
            .get("available")
            .and_then(Value::as_bool)
            .unwrap_or(true),
    }
}

/// Parse a suggest response body into at most `limit` summaries
///
/// # Errors
/// `SearchError::Parse` when the body is not JSON or has no product list.
pub fn parse_suggest_response(body: &str, limit: usize) -> SearchResult<Vec<ProductSummary>> {
    if body.trim().is_empty() {
        return Err(SearchError::Parse("empty response body".to_string()));
    }
    let json: Value = serde_json::from_str(body)?;
    let products = json
        .pointer("/resources/results/products")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::Parse("missing resources.results.products".to_string()))?;

    Ok(products.iter().take(limit).map(normalize_product).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_well_formed_response() {
        let body = json!({
            "resources": { "results": { "products": [
                {
                    "id": 42,
                    "title": "Canvas Tote",
                    "handle": "canvas-tote",
                    "url": "/products/canvas-tote?_pos=1",
                    "price": "24.00",
                    "vendor": "Acme",
                    "type": "Bag",
                    "available": false,
                    "featured_image": { "url": "https://cdn.example.com/tote.jpg" }
                }
            ]}}
        })
        .to_string();

        let products = parse_suggest_response(&body, 10).expect("valid body");
        assert_eq!(products.len(), 1);
        let tote = &products[0];
        assert_eq!(tote.id, 42);
        assert_eq!(tote.title, "Canvas Tote");
        assert_eq!(tote.price, "24.00");
        assert_eq!(tote.product_type, "Bag");
        assert!(!tote.available);
        assert_eq!(tote.image.as_deref(), Some("https://cdn.example.com/tote.jpg"));
    }

    #[test]
    fn test_missing_fields_degrade_per_field() {
        let body = r#"{"resources":{"results":{"products":[{"handle":"mystery"},{}, 7]}}}"#;
        let products = parse_suggest_response(body, 10).expect("product list present");
        assert_eq!(products.len(), 3);
        assert_eq!(products[0].title, PLACEHOLDER_TITLE);
        assert_eq!(products[0].url, "/products/mystery");
        assert_eq!(products[1].url, PLACEHOLDER_URL);
        assert_eq!(products[2].id, 0);
        assert!(products[2].image.is_none());
    }

    #[test]
    fn test_gid_and_numeric_price() {
        let body = r#"{"resources":{"results":{"products":[{"id":"gid://shopify/Product/77","price":19.5}]}}}"#;
        let products = parse_suggest_response(body, 10).expect("valid body");
        assert_eq!(products[0].id, 77);
        assert_eq!(products[0].price, "19.5");
    }

    #[test]
    fn test_limit_applied() {
        let items: Vec<Value> = (0..12).map(|i| json!({ "id": i })).collect();
        let body = json!({ "resources": { "results": { "products": items } } }).to_string();
        assert_eq!(parse_suggest_response(&body, 8).expect("valid").len(), 8);
    }

    #[test]
    fn test_malformed_bodies() {
        for body in ["", "not json", "{}", r#"{"resources":{"results":{}}}"#] {
            assert!(
                matches!(parse_suggest_response(body, 10), Err(SearchError::Parse(_))),
                "expected parse error for {body:?}"
            );
        }
    }

    #[test]
    fn test_viewport_limits() {
        assert_eq!(ResultLimit::for_viewport(375).get(), 8);
        assert_eq!(ResultLimit::for_viewport(768).get(), 8);
        assert_eq!(ResultLimit::for_viewport(769).get(), 10);
    }
}
