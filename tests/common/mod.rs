//! Shared fixtures for the storefront_search integration tests

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use storefront_search::cache::MemoryStore;
use storefront_search::config::SearchConfig;
use storefront_search::search::{
    ProductSummary, SearchError, SearchOrchestrator, SuggestClient, SuggestFuture,
};

/// Canned reply for one query
#[derive(Clone)]
pub struct Reply {
    pub delay: Duration,
    pub result: Result<Vec<ProductSummary>, SearchError>,
}

impl Reply {
    #[allow(dead_code)]
    pub fn ok(products: Vec<ProductSummary>) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(products),
        }
    }

    #[allow(dead_code)]
    pub fn err(error: SearchError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    #[allow(dead_code)]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// `SuggestClient` answering from a script and recording every request
///
/// Unscripted queries get one product titled after the query.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, query: &str, reply: Reply) {
        self.replies.lock().insert(query.to_string(), reply);
    }

    /// Queries requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(q, _)| q.clone()).collect()
    }

    #[allow(dead_code)]
    pub fn limits(&self) -> Vec<usize> {
        self.calls.lock().iter().map(|(_, l)| *l).collect()
    }
}

impl SuggestClient for ScriptedClient {
    fn suggest<'a>(&'a self, query: &'a str, limit: usize) -> SuggestFuture<'a> {
        self.calls.lock().push((query.to_string(), limit));
        let reply = self
            .replies
            .lock()
            .get(query)
            .cloned()
            .unwrap_or_else(|| Reply::ok(vec![product(1, query)]));
        Box::pin(async move {
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            reply.result
        })
    }
}

pub fn product(id: u64, title: &str) -> ProductSummary {
    ProductSummary {
        id,
        title: title.to_string(),
        handle: title.to_lowercase().replace(' ', "-"),
        url: format!("/products/{}", title.to_lowercase().replace(' ', "-")),
        price: "19.99".to_string(),
        available: true,
        ..ProductSummary::default()
    }
}

pub fn config() -> SearchConfig {
    SearchConfig::builder()
        .base_url("https://shop.example.com")
        .build()
        .expect("valid config")
}

/// Orchestrator over a scripted client and an in-memory store
pub fn orchestrator(client: &Arc<ScriptedClient>) -> SearchOrchestrator {
    SearchOrchestrator::new(config(), client.clone(), Arc::new(MemoryStore::new()))
}
