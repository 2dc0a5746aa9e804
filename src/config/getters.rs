//! Getter methods for `SearchConfig`

use std::time::Duration;
use url::Url;

use super::types::SearchConfig;

impl SearchConfig {
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    #[must_use]
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    #[must_use]
    pub fn result_limit(&self) -> usize {
        self.result_limit
    }

    #[must_use]
    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    #[must_use]
    pub fn min_query_chars(&self) -> usize {
        self.min_query_chars
    }

    #[must_use]
    pub fn max_query_chars(&self) -> usize {
        self.max_query_chars
    }

    /// Full URL of the suggest endpoint for this store
    ///
    /// Returns `None` only if the base URL cannot be a base (never the case
    /// for URLs accepted by the builder).
    #[must_use]
    pub fn suggest_url(&self) -> Option<Url> {
        self.base_url.join(crate::utils::SUGGEST_PATH).ok()
    }
}
