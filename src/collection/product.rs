//! Product snapshots as embedded in collection pages
//!
//! Two record shapes are accepted: the flat shape with `options_by_name` on
//! each variant, and the storefront's positional shape where the product
//! lists option names (`"options": ["Color", "Size"]`) and each variant
//! lists values in the same order (`"options": ["Black", "M"]` or
//! `option1`/`option2`/`option3`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// A purchasable combination of option values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: u64,
    pub available: bool,
    /// Option name to value, e.g. `{"Color": "Black", "Size": "M"}`
    pub options_by_name: BTreeMap<String, String>,
}

impl Variant {
    /// Value of the option whose name matches `name` case-insensitively
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options_by_name
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Immutable product snapshot. Prices are in minor units (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub handle: String,
    pub product_type: String,
    pub vendor: String,
    pub tags: BTreeSet<String>,
    pub available: bool,
    pub price_min: u64,
    pub price_max: u64,
    pub sales_rank: Option<u32>,
    pub variants: Vec<Variant>,
}

impl Product {
    /// Minimal product, mostly useful for building fixtures
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            handle: String::new(),
            product_type: String::new(),
            vendor: String::new(),
            tags: BTreeSet::new(),
            available: true,
            price_min: 0,
            price_max: 0,
            sales_rank: None,
            variants: Vec::new(),
        }
    }

    /// Distinct values of the named variant option, in variant order
    pub fn option_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let mut seen = BTreeSet::new();
        self.variants
            .iter()
            .filter_map(move |variant| variant.option(name))
            .filter(move |value| seen.insert(value.to_lowercase()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagList {
    List(Vec<String>),
    Csv(String),
}

impl Default for TagList {
    fn default() -> Self {
        TagList::List(Vec::new())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OptionName {
    Plain(String),
    Named { name: String },
}

#[derive(Deserialize)]
struct RawVariant {
    id: u64,
    #[serde(default = "default_true")]
    available: bool,
    #[serde(default, alias = "optionsByName")]
    options_by_name: BTreeMap<String, String>,
    #[serde(default)]
    options: Vec<String>,
    option1: Option<String>,
    option2: Option<String>,
    option3: Option<String>,
}

#[derive(Deserialize)]
struct RawProduct {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    handle: String,
    #[serde(default, alias = "type")]
    product_type: String,
    #[serde(default)]
    vendor: String,
    #[serde(default)]
    tags: TagList,
    #[serde(default = "default_true")]
    available: bool,
    #[serde(default, alias = "priceMin")]
    price_min: Option<u64>,
    #[serde(default, alias = "priceMax")]
    price_max: Option<u64>,
    #[serde(default)]
    price: Option<u64>,
    #[serde(default, alias = "salesRank")]
    sales_rank: Option<u32>,
    #[serde(default)]
    options: Vec<OptionName>,
    #[serde(default)]
    variants: Vec<RawVariant>,
}

fn default_true() -> bool {
    true
}

impl RawVariant {
    fn into_variant(self, option_names: &[String]) -> Variant {
        let mut options_by_name = self.options_by_name;
        let positional: Vec<String> = if self.options.is_empty() {
            [self.option1, self.option2, self.option3]
                .into_iter()
                .flatten()
                .collect()
        } else {
            self.options
        };
        for (name, value) in option_names.iter().zip(positional) {
            options_by_name.entry(name.clone()).or_insert(value);
        }
        Variant {
            id: self.id,
            available: self.available,
            options_by_name,
        }
    }
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        let option_names: Vec<String> = raw
            .options
            .into_iter()
            .map(|option| match option {
                OptionName::Plain(name) | OptionName::Named { name } => name,
            })
            .collect();

        let tags = match raw.tags {
            TagList::List(tags) => tags,
            TagList::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        }
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

        let price_min = raw.price_min.or(raw.price).unwrap_or(0);
        let price_max = raw.price_max.unwrap_or(price_min).max(price_min);

        Product {
            id: raw.id,
            title: raw.title,
            handle: raw.handle,
            product_type: raw.product_type.trim().to_string(),
            vendor: raw.vendor,
            tags,
            available: raw.available,
            price_min,
            price_max,
            sales_rank: raw.sales_rank,
            variants: raw
                .variants
                .into_iter()
                .map(|variant| variant.into_variant(&option_names))
                .collect(),
        }
    }
}

/// A record that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position in the input array
    pub index: usize,
    pub reason: String,
}

/// Products decoded from a page, plus the records that were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedProducts {
    pub products: Vec<Product>,
    pub skipped: Vec<SkippedRecord>,
}

/// Decode a product array record by record
///
/// Accepts either a bare array or an object with a `products` array. A
/// malformed record is skipped and reported; it never aborts the list.
///
/// # Errors
/// Only when the input is not JSON or holds no product array at all.
pub fn parse_products(json: &str) -> Result<ParsedProducts, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    let records = match value {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("products") {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(serde::de::Error::custom("expected a `products` array"));
            }
        },
        _ => return Err(serde::de::Error::custom("expected a product array")),
    };

    let mut parsed = ParsedProducts::default();
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<RawProduct>(record) {
            Ok(raw) => parsed.products.push(raw.into()),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed product record");
                parsed.skipped.push(SkippedRecord {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok(parsed)
}
