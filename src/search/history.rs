//! Recent search history kept in key/value storage
//!
//! Stored as a JSON array of strings, most recent first. Like the result
//! cache, history is best effort: storage failures are logged and ignored.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::cache::KeyValueStore;
use crate::utils::{HISTORY_KEY, fold_key};

pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
    // Serializes read-modify-write of the stored list
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for SearchHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHistory")
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl SearchHistory {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
            write_lock: Mutex::new(()),
        }
    }

    /// Recent queries, most recent first
    #[must_use]
    pub fn recent(&self) -> Vec<String> {
        self.store
            .get(HISTORY_KEY)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .unwrap_or_default()
    }

    /// Move `query` to the front, dropping case-insensitive duplicates
    pub fn record(&self, query: &str) {
        let _guard = self.write_lock.lock();
        let key = fold_key(query);
        if key.is_empty() {
            return;
        }
        let mut entries = self.recent();
        entries.retain(|existing| fold_key(existing) != key);
        entries.insert(0, query.to_string());
        entries.truncate(self.limit);

        match serde_json::to_string(&entries) {
            Ok(json) => {
                if let Err(e) = self.store.set(HISTORY_KEY, json) {
                    debug!(error = %e, "Failed to persist search history");
                }
            }
            Err(e) => debug!(error = %e, "Failed to encode search history"),
        }
    }

    pub fn clear(&self) {
        let _guard = self.write_lock.lock();
        self.store.remove(HISTORY_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;

    #[test]
    fn test_most_recent_first_and_deduplicated() {
        let history = SearchHistory::new(Arc::new(MemoryStore::new()), 3);
        history.record("boots");
        history.record("hats");
        history.record("Boots");
        assert_eq!(history.recent(), vec!["Boots", "hats"]);
    }

    #[test]
    fn test_limit_enforced() {
        let history = SearchHistory::new(Arc::new(MemoryStore::new()), 2);
        for q in ["a1", "b2", "c3"] {
            history.record(q);
        }
        assert_eq!(history.recent(), vec!["c3", "b2"]);
        history.clear();
        assert!(history.recent().is_empty());
    }

    #[test]
    fn test_storage_failure_ignored() {
        let history = SearchHistory::new(Arc::new(MemoryStore::unavailable()), 5);
        history.record("boots");
        assert!(history.recent().is_empty());
    }
}
