//! Keyed debouncing for rapid input streams
//!
//! Each logical input stream (one search box, one filter form) is identified
//! by a key. Scheduling an action for a key replaces any action still waiting
//! on that key; the replaced action is dropped without running.
//!
//! Once an action fires it is no longer pending, so later schedules never
//! abort work that has already started. Superseding a running network call is
//! the caller's job (see `SearchOrchestrator::search_debounced`).

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

struct PendingAction {
    id: u64,
    handle: JoinHandle<()>,
}

/// Coalesces bursts of scheduled actions into the last one per key
///
/// Requires a running tokio runtime when `schedule` is called.
#[derive(Clone, Default)]
pub struct Debouncer {
    pending: Arc<Mutex<HashMap<String, PendingAction>>>,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl Debouncer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay`, unless another action is scheduled for
    /// `key` first.
    pub fn schedule<F, Fut>(&self, key: impl Into<String>, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // Hold the lock across spawn + insert so a zero delay cannot fire
        // before the entry exists.
        let mut pending = self.pending.lock();

        let map = Arc::clone(&self.pending);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut pending = map.lock();
                match pending.get(&task_key) {
                    Some(entry) if entry.id == id => {
                        pending.remove(&task_key);
                    }
                    _ => return,
                }
            }
            trace!(key = %task_key, "Debounced action firing");
            action().await;
        });

        if let Some(previous) = pending.insert(key, PendingAction { id, handle }) {
            trace!(id = previous.id, "Discarding superseded debounced action");
            previous.handle.abort();
        }
    }

    /// Drop the pending action for `key`, if any. Idempotent.
    pub fn cancel(&self, key: &str) -> bool {
        match self.pending.lock().remove(key) {
            Some(entry) => {
                entry.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Drop every pending action
    pub fn cancel_all(&self) {
        let drained: Vec<PendingAction> = self.pending.lock().drain().map(|(_, v)| v).collect();
        for entry in drained {
            entry.handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.lock().contains_key(key)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_last_action_once() {
        let debouncer = Debouncer::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(String::new()));

        for value in ["s", "sh", "sho", "shoe", "shoes"] {
            let calls = Arc::clone(&calls);
            let last = Arc::clone(&last);
            let value = value.to_string();
            debouncer.schedule("search", Duration::from_millis(300), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                *last.lock() = value;
            });
            tokio::time::sleep(Duration::from_millis(299)).await;
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(last.lock().as_str(), "shoes");
        assert_eq!(debouncer.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let debouncer = Debouncer::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for key in ["search", "filters"] {
            let calls = Arc::clone(&calls);
            debouncer.schedule(key, Duration::from_millis(50), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let debouncer = Debouncer::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        debouncer.schedule("search", Duration::from_millis(50), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(debouncer.is_pending("search"));
        assert!(debouncer.cancel("search"));
        assert!(!debouncer.cancel("search"));
        assert!(!debouncer.cancel("never-scheduled"));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_is_noop() {
        let debouncer = Debouncer::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        debouncer.schedule("search", Duration::from_millis(10), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!debouncer.cancel("search"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
