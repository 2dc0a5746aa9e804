//! Search result cache with per-entry TTL and bounded LRU size
//!
//! Entries are JSON documents in a `KeyValueStore` under
//! `storefront_search:cache:<normalized query>`. The cache is an
//! optimization only: every storage failure degrades to a miss.

use chrono::{DateTime, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::storage::KeyValueStore;
use crate::search::ProductSummary;
use crate::utils::{CACHE_KEY_PREFIX, DEFAULT_CACHE_CAPACITY, fold_key};

/// A stored result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCacheEntry {
    /// Normalized query the entry is keyed by
    pub query: String,
    pub results: Vec<ProductSummary>,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SearchCacheEntry {
    /// An entry is served up to and including `expires_at`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Normalize a query into its cache key (case-folded, whitespace-collapsed)
#[must_use]
pub fn cache_key(query: &str) -> String {
    fold_key(query)
}

fn storage_key(normalized: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{normalized}")
}

/// TTL + LRU cache of suggest results
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    /// Recency order of normalized keys; the store holds the payloads
    recency: Mutex<LruCache<String, ()>>,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl ResultCache {
    /// Create a cache over `store` using the system clock
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self::with_clock(store, capacity, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit clock
    ///
    /// Entries already present in `store` are adopted, oldest first, so a
    /// persisted cache keeps its LRU bound across restarts.
    #[must_use]
    pub fn with_clock(store: Arc<dyn KeyValueStore>, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CACHE_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        let cache = Self {
            store,
            clock,
            recency: Mutex::new(LruCache::new(capacity)),
        };
        cache.adopt_existing();
        cache
    }

    fn adopt_existing(&self) {
        let mut existing: Vec<(DateTime<Utc>, String)> = self
            .store
            .keys()
            .into_iter()
            .filter_map(|key| {
                let normalized = key.strip_prefix(CACHE_KEY_PREFIX)?.to_string();
                let entry = self.read_entry(&normalized)?;
                Some((entry.stored_at, normalized))
            })
            .collect();
        existing.sort();
        for (_, normalized) in existing {
            self.touch(&normalized);
        }
    }

    /// Decode the stored entry; a corrupt entry is deleted
    fn read_entry(&self, normalized: &str) -> Option<SearchCacheEntry> {
        let key = storage_key(normalized);
        let raw = self.store.get(&key)?;
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(key = %key, error = %e, "Removing undecodable cache entry");
                self.store.remove(&key);
                None
            }
        }
    }

    /// Mark `normalized` most recently used, evicting the LRU entry if full
    fn touch(&self, normalized: &str) {
        let evicted = self.recency.lock().push(normalized.to_string(), ());
        if let Some((evicted_key, ())) = evicted
            && evicted_key != normalized
        {
            debug!(evicted = %evicted_key, "LRU eviction from search cache");
            self.store.remove(&storage_key(&evicted_key));
        }
    }

    fn forget(&self, normalized: &str) {
        self.recency.lock().pop(normalized);
        self.store.remove(&storage_key(normalized));
    }

    /// Cached results for `query`, or `None` if absent or expired
    pub fn get(&self, query: &str) -> Option<Vec<ProductSummary>> {
        let normalized = cache_key(query);
        let entry = match self.read_entry(&normalized) {
            Some(entry) => entry,
            None => {
                self.recency.lock().pop(&normalized);
                return None;
            }
        };

        if entry.is_expired(self.clock.now()) {
            debug!(query = %normalized, "Search cache entry expired");
            self.forget(&normalized);
            return None;
        }

        self.touch(&normalized);
        Some(entry.results)
    }

    /// Best-effort store of `results` for `query`
    ///
    /// Returns whether the entry was written. On a failed write the cache
    /// drops expired entries and tries once more before giving up.
    pub fn put(&self, query: &str, results: &[ProductSummary], ttl: Duration) -> bool {
        let normalized = cache_key(query);
        let stored_at = self.clock.now();
        let ttl = chrono::TimeDelta::from_std(ttl).unwrap_or(chrono::TimeDelta::MAX);
        let entry = SearchCacheEntry {
            query: normalized.clone(),
            results: results.to_vec(),
            stored_at,
            expires_at: stored_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                warn!(query = %normalized, error = %e, "Failed to encode cache entry");
                return false;
            }
        };

        self.touch(&normalized);
        let key = storage_key(&normalized);
        if let Err(first) = self.store.set(&key, json.clone()) {
            debug!(query = %normalized, error = %first, "Cache write failed, pruning and retrying");
            self.prune_expired();
            if let Err(second) = self.store.set(&key, json) {
                warn!(query = %normalized, error = %second, "Search cache disabled for this entry");
                self.recency.lock().pop(&normalized);
                return false;
            }
        }
        true
    }

    /// Remove every expired or corrupt entry, returning how many were dropped
    pub fn prune_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        for key in self.store.keys() {
            let Some(normalized) = key.strip_prefix(CACHE_KEY_PREFIX) else {
                continue;
            };
            match self.read_entry(normalized) {
                Some(entry) if !entry.is_expired(now) => {}
                Some(_) => {
                    self.forget(normalized);
                    removed += 1;
                }
                None => {
                    // read_entry already deleted the payload
                    self.recency.lock().pop(normalized);
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Remove `query` from the cache
    pub fn invalidate(&self, query: &str) {
        self.forget(&cache_key(query));
    }

    /// Remove every cache entry (other namespaces in the store are untouched)
    pub fn clear(&self) {
        for key in self.store.keys() {
            if key.starts_with(CACHE_KEY_PREFIX) {
                self.store.remove(&key);
            }
        }
        self.recency.lock().clear();
    }

    /// Number of tracked entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.recency.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.recency.lock().cap().get()
    }
}
