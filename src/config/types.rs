//! Core configuration types for storefront search
//!
//! This module contains the main `SearchConfig` struct and the error type
//! returned when a configuration fails validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Main configuration struct for the search orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Store root that hosts `/search/suggest.json`.
    ///
    /// **INVARIANT:** Always an absolute http(s) URL without a trailing path
    /// component (normalized in builder).
    pub(crate) base_url: Url,

    /// Quiet period before a typed query is sent
    ///
    /// Default: 300ms
    pub(crate) debounce: Duration,

    /// Hard deadline for a single suggest request
    ///
    /// Default: 8 seconds
    pub(crate) request_timeout: Duration,

    /// Lifetime of a cached result set
    ///
    /// Default: 5 minutes
    pub(crate) cache_ttl: Duration,

    /// Maximum number of cached queries before LRU eviction
    pub(crate) cache_capacity: usize,

    /// Products requested per suggest call (8 on mobile, 10 on desktop)
    pub(crate) result_limit: usize,

    /// Number of recent searches remembered
    pub(crate) history_limit: usize,

    pub(crate) min_query_chars: usize,
    pub(crate) max_query_chars: usize,
}

/// Reasons a configuration is rejected by the builder
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid store URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("min_query_chars ({min}) exceeds max_query_chars ({max})")]
    QueryBounds { min: usize, max: usize },
}
