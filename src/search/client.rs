//! Suggest endpoint client
//!
//! `SuggestClient` is the seam between the orchestrator and the network, so
//! the orchestrator can be driven by scripted clients in tests.
//! `HttpSuggestClient` talks to the hosted `/search/suggest.json` endpoint.

use reqwest::{Client, StatusCode, header};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::errors::{SearchError, SearchResult};
use super::response::{ProductSummary, parse_suggest_response};
use crate::config::SearchConfig;
use crate::utils::{SUGGEST_PATH, USER_AGENT};

/// Boxed future returned by `SuggestClient::suggest`
pub type SuggestFuture<'a> =
    Pin<Box<dyn Future<Output = SearchResult<Vec<ProductSummary>>> + Send + 'a>>;

/// Fetches product suggestions for a sanitized query
pub trait SuggestClient: Send + Sync {
    /// Fetch at most `limit` products matching `query`
    fn suggest<'a>(&'a self, query: &'a str, limit: usize) -> SuggestFuture<'a>;
}

/// `reqwest`-backed client for the storefront predictive search endpoint
#[derive(Debug, Clone)]
pub struct HttpSuggestClient {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpSuggestClient {
    /// Build a client for the store configured in `config`
    ///
    /// # Errors
    /// `SearchError::Network` if the HTTP client cannot be constructed.
    pub fn new(config: &SearchConfig) -> SearchResult<Self> {
        let endpoint = config
            .base_url()
            .join(SUGGEST_PATH)
            .map_err(|e| SearchError::Network(format!("Invalid suggest URL: {e}")))?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SearchError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            timeout: config.request_timeout(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for `query`
    #[must_use]
    pub fn request_url(&self, query: &str, limit: usize) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("resources[type]", "product")
            .append_pair("resources[limit]", &limit.to_string());
        url
    }

    async fn fetch(&self, query: &str, limit: usize) -> SearchResult<Vec<ProductSummary>> {
        let url = self.request_url(query, limit);
        debug!(url = %url, "Requesting search suggestions");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(SearchError::RateLimited { retry_after });
        }
        if !status.is_success() {
            return Err(SearchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(&e))?;
        parse_suggest_response(&body, limit)
    }

    fn classify(&self, error: &reqwest::Error) -> SearchError {
        if error.is_timeout() {
            SearchError::Timeout(self.timeout)
        } else if error.is_decode() {
            SearchError::Parse(error.to_string())
        } else {
            SearchError::Network(error.to_string())
        }
    }
}

impl SuggestClient for HttpSuggestClient {
    fn suggest<'a>(&'a self, query: &'a str, limit: usize) -> SuggestFuture<'a> {
        Box::pin(self.fetch(query, limit))
    }
}
