//! Search orchestration: sanitize, consult the cache, fetch, settle
//!
//! `SearchOrchestrator` owns the `SearchState` machine. Every accepted query
//! gets a generation number; a result is committed only while its generation
//! is still current, so a slow early response can never overwrite a later
//! one. Superseded requests are also aborted so they stop consuming the
//! connection.

use futures::future::{AbortHandle, Abortable};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::client::{HttpSuggestClient, SuggestClient};
use super::errors::{ErrorKind, SearchError, SearchResult};
use super::events::{SearchEvent, SearchEventBus};
use super::history::SearchHistory;
use super::response::{ProductSummary, ResultLimit};
use super::state::SearchState;
use crate::cache::{Clock, KeyValueStore, ResultCache, SystemClock};
use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::sanitizer::{QuerySanitizer, ValidationReason};
use crate::utils::{EVENT_CHANNEL_CAPACITY, safe_truncate_chars};

/// Debouncer key for the search input stream
const SEARCH_INPUT_KEY: &str = "search-input";

/// Render callback registered through `on_result`
pub type ResultCallback = Arc<dyn Fn(&SearchOutcome) + Send + Sync>;

/// How one call to `search` ended
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results {
        query: String,
        products: Vec<ProductSummary>,
        from_cache: bool,
    },
    Empty {
        query: String,
    },
    /// Rejected by the sanitizer; no request was made
    Invalid {
        reason: ValidationReason,
        message: &'static str,
    },
    Failed {
        query: String,
        error: SearchError,
        message: &'static str,
    },
    /// Replaced by a newer search, cleared, or the orchestrator was destroyed
    Superseded {
        query: String,
    },
}

impl SearchOutcome {
    /// Products to render; empty for every outcome but `Results`
    #[must_use]
    pub fn products(&self) -> &[ProductSummary] {
        match self {
            SearchOutcome::Results { products, .. } => products,
            _ => &[],
        }
    }

    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            SearchOutcome::Invalid { .. } => Some(ErrorKind::Validation),
            SearchOutcome::Failed { error, .. } => Some(error.kind()),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    state: SearchState,
    query: Option<String>,
    /// Last accepted query, kept for `retry`
    last_query: Option<String>,
    generation: u64,
    inflight: Option<AbortHandle>,
}

impl Session {
    /// Start a new generation, aborting whatever was in flight
    fn supersede(&mut self) -> u64 {
        self.generation += 1;
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
        self.generation
    }

    /// Apply a transition if legal, returning the event to publish
    fn transition(&mut self, next: SearchState) -> Option<SearchEvent> {
        let previous = self.state;
        if previous == next && next != SearchState::Searching && !next.is_settled() {
            return None;
        }
        if !previous.can_transition_to(next) {
            warn!(from = %previous, to = %next, "Refusing invalid search state transition");
            return None;
        }
        self.state = next;
        Some(SearchEvent::state_change(previous, next, self.query.clone()))
    }
}

struct Inner {
    config: SearchConfig,
    sanitizer: QuerySanitizer,
    client: Arc<dyn SuggestClient>,
    cache: ResultCache,
    history: SearchHistory,
    session: Mutex<Session>,
    events: SearchEventBus,
    callbacks: RwLock<Vec<ResultCallback>>,
    debouncer: Debouncer,
    result_limit: AtomicUsize,
    destroyed: AtomicBool,
}

/// Debounced, cancellable, cached product search
///
/// Cheap to clone; clones share one state machine.
#[derive(Clone)]
pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("state", &self.state())
            .field("query", &self.query())
            .finish_non_exhaustive()
    }
}

impl SearchOrchestrator {
    /// Create an orchestrator over an explicit client and storage backend
    #[must_use]
    pub fn new(
        config: SearchConfig,
        client: Arc<dyn SuggestClient>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self::with_clock(config, client, store, Arc::new(SystemClock))
    }

    /// Like `new`, with the cache reading time from `clock`
    #[must_use]
    pub fn with_clock(
        config: SearchConfig,
        client: Arc<dyn SuggestClient>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = ResultCache::with_clock(Arc::clone(&store), config.cache_capacity(), clock);
        let history = SearchHistory::new(store, config.history_limit());
        let sanitizer = QuerySanitizer::new(config.min_query_chars(), config.max_query_chars());
        let result_limit = AtomicUsize::new(config.result_limit());

        Self {
            inner: Arc::new(Inner {
                config,
                sanitizer,
                client,
                cache,
                history,
                session: Mutex::new(Session::default()),
                events: SearchEventBus::new(EVENT_CHANNEL_CAPACITY),
                callbacks: RwLock::new(Vec::new()),
                debouncer: Debouncer::new(),
                result_limit,
                destroyed: AtomicBool::new(false),
            }),
        }
    }

    /// Create an orchestrator that queries the store over HTTP
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be built.
    pub fn http(config: SearchConfig, store: Arc<dyn KeyValueStore>) -> SearchResult<Self> {
        let client = HttpSuggestClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client), store))
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        self.inner.session.lock().state
    }

    /// Query of the current (or last settled) search
    #[must_use]
    pub fn query(&self) -> Option<String> {
        self.inner.session.lock().query.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.inner.events.subscribe()
    }

    /// Register a render callback invoked for `Results` and `Empty` outcomes
    pub fn on_result<F>(&self, callback: F)
    where
        F: Fn(&SearchOutcome) + Send + Sync + 'static,
    {
        self.inner.callbacks.write().push(Arc::new(callback));
    }

    #[must_use]
    pub fn cache(&self) -> &ResultCache {
        &self.inner.cache
    }

    #[must_use]
    pub fn recent_searches(&self) -> Vec<String> {
        self.inner.history.recent()
    }

    pub fn clear_history(&self) {
        self.inner.history.clear();
    }

    /// Adjust the result limit after a viewport resize
    pub fn set_viewport_width(&self, width_px: u32) {
        self.inner
            .result_limit
            .store(ResultLimit::for_viewport(width_px).get(), Ordering::Relaxed);
    }

    #[must_use]
    pub fn result_limit(&self) -> usize {
        self.inner.result_limit.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::Acquire)
    }

    /// Search immediately, bypassing the debouncer
    pub async fn search(&self, raw: &str) -> SearchOutcome {
        if self.is_destroyed() {
            return SearchOutcome::Superseded {
                query: raw.to_string(),
            };
        }
        match self.inner.sanitizer.sanitize(raw).into_result() {
            Ok(query) => self.run(query, true).await,
            Err(reason) => self.reject(raw, reason),
        }
    }

    /// Search after the configured debounce window
    ///
    /// Any request already in flight is cancelled right away; only the last
    /// call within the window reaches the network.
    pub fn search_debounced(&self, raw: impl Into<String>) {
        if self.is_destroyed() {
            return;
        }
        self.inner.session.lock().supersede();

        let raw = raw.into();
        let this = self.clone();
        self.inner
            .debouncer
            .schedule(SEARCH_INPUT_KEY, self.inner.config.debounce(), move || async move {
                this.search(&raw).await;
            });
    }

    /// Re-run the last accepted query, skipping the cache
    ///
    /// Returns `None` when nothing has been searched yet.
    pub async fn retry(&self) -> Option<SearchOutcome> {
        if self.is_destroyed() {
            return None;
        }
        let query = self.inner.session.lock().last_query.clone()?;
        info!(query = %query, "Retrying search");
        Some(self.run(query, false).await)
    }

    /// Cancel pending and in-flight work and return to `Idle`
    pub fn clear(&self) {
        self.inner.debouncer.cancel(SEARCH_INPUT_KEY);
        let event = {
            let mut session = self.inner.session.lock();
            session.supersede();
            let event = session.transition(SearchState::Idle);
            session.query = None;
            event
        };
        if let Some(event) = event {
            self.inner.events.publish(event);
        }
    }

    /// Tear down: cancel everything, drop callbacks, ignore further calls
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.debouncer.cancel_all();
        let transition = {
            let mut session = self.inner.session.lock();
            session.supersede();
            let event = session.transition(SearchState::Idle);
            session.query = None;
            event
        };
        if let Some(event) = transition {
            self.inner.events.publish(event);
        }
        self.inner.callbacks.write().clear();
        debug!("Search orchestrator destroyed");
    }

    fn reject(&self, raw: &str, reason: ValidationReason) -> SearchOutcome {
        let message = reason.user_message();
        debug!(preview = safe_truncate_chars(raw, 40), %reason, "Search query rejected");

        let transition = {
            let mut session = self.inner.session.lock();
            session.supersede();
            // The event names the rejected text; the session keeps no query
            session.query = Some(raw.to_string());
            let event = session.transition(SearchState::Idle);
            session.query = None;
            event
        };

        self.inner
            .events
            .publish(SearchEvent::error(raw, ErrorKind::Validation, message));
        if let Some(event) = transition {
            self.inner.events.publish(event);
        }
        SearchOutcome::Invalid { reason, message }
    }

    async fn run(&self, query: String, use_cache: bool) -> SearchOutcome {
        let generation = {
            let mut session = self.inner.session.lock();
            session.last_query = Some(query.clone());
            session.query = Some(query.clone());
            session.supersede()
        };
        self.inner.events.publish(SearchEvent::started(query.clone()));

        if use_cache && let Some(products) = self.inner.cache.get(&query) {
            debug!(query = %query, count = products.len(), "Search cache hit");
            return self.settle(generation, query, Ok(products), true);
        }

        let (handle, registration) = AbortHandle::new_pair();
        let transition = {
            let mut session = self.inner.session.lock();
            if session.generation != generation {
                return SearchOutcome::Superseded { query };
            }
            session.inflight = Some(handle);
            session.transition(SearchState::Searching)
        };
        if let Some(event) = transition {
            self.inner.events.publish(event);
        }

        let limit = self.result_limit();
        let timeout = self.inner.config.request_timeout();
        let request = Abortable::new(self.inner.client.suggest(&query, limit), registration);
        let result = match tokio::time::timeout(timeout, request).await {
            Ok(Ok(result)) => result,
            Ok(Err(_aborted)) => Err(SearchError::Cancelled),
            Err(_elapsed) => Err(SearchError::Timeout(timeout)),
        };

        self.settle(generation, query, result, false)
    }

    /// Commit a finished request if it is still the current one
    fn settle(
        &self,
        generation: u64,
        query: String,
        result: SearchResult<Vec<ProductSummary>>,
        from_cache: bool,
    ) -> SearchOutcome {
        let (outcome, transition) = {
            let mut session = self.inner.session.lock();
            if session.generation != generation || self.is_destroyed() {
                debug!(query = %query, "Discarding superseded search result");
                return SearchOutcome::Superseded { query };
            }
            session.inflight = None;

            let outcome = match result {
                Ok(products) if products.is_empty() => SearchOutcome::Empty {
                    query: query.clone(),
                },
                Ok(products) => SearchOutcome::Results {
                    query: query.clone(),
                    products,
                    from_cache,
                },
                Err(SearchError::Cancelled) => {
                    return SearchOutcome::Superseded { query };
                }
                Err(error) => SearchOutcome::Failed {
                    query: query.clone(),
                    message: error.user_message(),
                    error,
                },
            };
            let next = match &outcome {
                SearchOutcome::Results { .. } => SearchState::Results,
                SearchOutcome::Empty { .. } => SearchState::Empty,
                _ => SearchState::Error,
            };
            (outcome, session.transition(next))
        };

        if let SearchOutcome::Results { products, .. } = &outcome {
            if !from_cache {
                self.inner
                    .cache
                    .put(&query, products, self.inner.config.cache_ttl());
            }
            self.inner.history.record(&query);
        }
        if matches!(outcome, SearchOutcome::Empty { .. }) && !from_cache {
            self.inner.cache.invalidate(&query);
        }

        if let Some(event) = transition {
            self.inner.events.publish(event);
        }

        match &outcome {
            SearchOutcome::Results { products, .. } => {
                info!(query = %query, count = products.len(), from_cache, "Search completed");
                self.inner
                    .events
                    .publish(SearchEvent::completed(query.as_str(), products.len(), from_cache));
                self.notify(&outcome);
            }
            SearchOutcome::Empty { .. } => {
                info!(query = %query, "Search returned no results");
                self.inner
                    .events
                    .publish(SearchEvent::completed(query.as_str(), 0, from_cache));
                self.notify(&outcome);
            }
            SearchOutcome::Failed { error, message, .. } => {
                warn!(query = %query, kind = %error.kind(), error = %error, "Search failed");
                self.inner
                    .events
                    .publish(SearchEvent::error(query.as_str(), error.kind(), *message));
            }
            SearchOutcome::Invalid { .. } | SearchOutcome::Superseded { .. } => {}
        }
        outcome
    }

    fn notify(&self, outcome: &SearchOutcome) {
        // Clone the list so callbacks may register further callbacks
        let callbacks: Vec<ResultCallback> = self.inner.callbacks.read().clone();
        for callback in callbacks {
            callback(outcome);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.debouncer.cancel_all();
        if let Some(handle) = self.session.get_mut().inflight.take() {
            handle.abort();
        }
    }
}

