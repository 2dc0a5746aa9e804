//! Type-safe builder for `SearchConfig` using the typestate pattern
//!
//! `build()` only exists once the store base URL has been supplied, so a
//! config without an endpoint cannot be constructed.

use std::marker::PhantomData;
use std::time::Duration;
use url::Url;

use super::types::{ConfigError, SearchConfig};
use crate::search::ResultLimit;
use crate::utils::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, DEFAULT_DEBOUNCE, DEFAULT_HISTORY_LIMIT,
    DEFAULT_REQUEST_TIMEOUT, DESKTOP_RESULT_LIMIT, MAX_QUERY_CHARS, MIN_QUERY_CHARS,
};

// Type states for the builder
pub struct NeedsBaseUrl;
pub struct WithBaseUrl;

pub struct SearchConfigBuilder<State = NeedsBaseUrl> {
    base_url: Option<String>,
    debounce: Duration,
    request_timeout: Duration,
    cache_ttl: Duration,
    cache_capacity: usize,
    result_limit: usize,
    history_limit: usize,
    min_query_chars: usize,
    max_query_chars: usize,
    _phantom: PhantomData<State>,
}

impl Default for SearchConfigBuilder<NeedsBaseUrl> {
    fn default() -> Self {
        Self {
            base_url: None,
            debounce: DEFAULT_DEBOUNCE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            result_limit: DESKTOP_RESULT_LIMIT,
            history_limit: DEFAULT_HISTORY_LIMIT,
            min_query_chars: MIN_QUERY_CHARS,
            max_query_chars: MAX_QUERY_CHARS,
            _phantom: PhantomData,
        }
    }
}

impl SearchConfig {
    /// Create a builder for configuring a `SearchConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> SearchConfigBuilder<NeedsBaseUrl> {
        SearchConfigBuilder::default()
    }
}

impl SearchConfigBuilder<NeedsBaseUrl> {
    /// Set the store root; `https://` is assumed when no scheme is given.
    pub fn base_url(self, url: impl Into<String>) -> SearchConfigBuilder<WithBaseUrl> {
        let url_string = url.into();
        let normalized = if url_string.starts_with("http://") || url_string.starts_with("https://")
        {
            url_string
        } else {
            format!("https://{url_string}")
        };

        SearchConfigBuilder {
            base_url: Some(normalized),
            debounce: self.debounce,
            request_timeout: self.request_timeout,
            cache_ttl: self.cache_ttl,
            cache_capacity: self.cache_capacity,
            result_limit: self.result_limit,
            history_limit: self.history_limit,
            min_query_chars: self.min_query_chars,
            max_query_chars: self.max_query_chars,
            _phantom: PhantomData,
        }
    }
}

impl<State> SearchConfigBuilder<State> {
    #[must_use]
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn result_limit(mut self, limit: usize) -> Self {
        self.result_limit = limit;
        self
    }

    /// Pick the result limit from the viewport width in CSS pixels
    #[must_use]
    pub fn viewport_width(mut self, width_px: u32) -> Self {
        self.result_limit = ResultLimit::for_viewport(width_px).get();
        self
    }

    #[must_use]
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    #[must_use]
    pub fn query_length(mut self, min_chars: usize, max_chars: usize) -> Self {
        self.min_query_chars = min_chars;
        self.max_query_chars = max_chars;
        self
    }
}

// Build method only available when the base URL is set
impl SearchConfigBuilder<WithBaseUrl> {
    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let raw = self.base_url.unwrap_or_default();
        let mut base_url = Url::parse(&raw).map_err(|e| ConfigError::InvalidBaseUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if base_url.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl {
                url: raw,
                reason: "missing host".to_string(),
            });
        }
        // The suggest path is joined onto the root, so drop any path or query
        base_url.set_path("/");
        base_url.set_query(None);
        base_url.set_fragment(None);

        let non_zero = [
            ("debounce", self.debounce.is_zero()),
            ("request_timeout", self.request_timeout.is_zero()),
            ("cache_ttl", self.cache_ttl.is_zero()),
            ("cache_capacity", self.cache_capacity == 0),
            ("result_limit", self.result_limit == 0),
            ("history_limit", self.history_limit == 0),
        ];
        if let Some((field, _)) = non_zero.iter().find(|(_, zero)| *zero) {
            return Err(ConfigError::Zero { field: *field });
        }
        if self.min_query_chars > self.max_query_chars {
            return Err(ConfigError::QueryBounds {
                min: self.min_query_chars,
                max: self.max_query_chars,
            });
        }

        Ok(SearchConfig {
            base_url,
            debounce: self.debounce,
            request_timeout: self.request_timeout,
            cache_ttl: self.cache_ttl,
            cache_capacity: self.cache_capacity,
            result_limit: self.result_limit,
            history_limit: self.history_limit,
            min_query_chars: self.min_query_chars,
            max_query_chars: self.max_query_chars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::builder()
            .base_url("shop.example.com")
            .build()
            .expect("valid config");
        assert_eq!(config.base_url().as_str(), "https://shop.example.com/");
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.result_limit(), 10);
        assert_eq!(
            config.suggest_url().map(|u| u.to_string()),
            Some("https://shop.example.com/search/suggest.json".to_string())
        );
    }

    #[test]
    fn test_path_is_dropped() {
        let config = SearchConfig::builder()
            .base_url("https://shop.example.com/collections/all?page=2")
            .build()
            .expect("valid config");
        assert_eq!(config.base_url().as_str(), "https://shop.example.com/");
    }

    #[test]
    fn test_zero_values_rejected() {
        let err = SearchConfig::builder()
            .cache_capacity(0)
            .base_url("https://shop.example.com")
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::Zero { field: "cache_capacity" });
    }

    #[test]
    fn test_inverted_query_bounds_rejected() {
        let err = SearchConfig::builder()
            .base_url("https://shop.example.com")
            .query_length(10, 5)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::QueryBounds { min: 10, max: 5 });
    }

    #[test]
    fn test_viewport_width_picks_limit() {
        let config = SearchConfig::builder()
            .viewport_width(375)
            .base_url("https://shop.example.com")
            .build()
            .expect("valid config");
        assert_eq!(config.result_limit(), 8);
    }
}
