//! Search lifecycle events and the broadcast bus that carries them
//!
//! Subscribers get every event published after they subscribe. Publishing
//! with no subscribers is not an error: nobody is rendering yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

use super::errors::ErrorKind;
use super::state::SearchState;

/// Event types emitted by the search orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchEvent {
    /// A valid query was accepted
    Started {
        query: String,
        timestamp: DateTime<Utc>,
    },
    /// A query settled with results or with none
    Completed {
        query: String,
        result_count: usize,
        from_cache: bool,
        timestamp: DateTime<Utc>,
    },
    /// A query was rejected or failed
    Error {
        query: String,
        kind: ErrorKind,
        message: String,
        timestamp: DateTime<Utc>,
    },
    /// The orchestrator moved between states
    StateChange {
        previous: SearchState,
        current: SearchState,
        query: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl SearchEvent {
    #[must_use]
    pub fn started(query: impl Into<String>) -> Self {
        SearchEvent::Started {
            query: query.into(),
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn completed(query: impl Into<String>, result_count: usize, from_cache: bool) -> Self {
        SearchEvent::Completed {
            query: query.into(),
            result_count,
            from_cache,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn error(query: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        SearchEvent::Error {
            query: query.into(),
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn state_change(previous: SearchState, current: SearchState, query: Option<String>) -> Self {
        SearchEvent::StateChange {
            previous,
            current,
            query,
            timestamp: Utc::now(),
        }
    }

    /// Short event name, matching the presentation layer's listener names
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SearchEvent::Started { .. } => "started",
            SearchEvent::Completed { .. } => "completed",
            SearchEvent::Error { .. } => "error",
            SearchEvent::StateChange { .. } => "stateChange",
        }
    }
}

/// Broadcast bus for `SearchEvent`s
#[derive(Debug, Clone)]
pub struct SearchEventBus {
    sender: broadcast::Sender<SearchEvent>,
}

impl SearchEventBus {
    /// Create a bus buffering up to `capacity` events per slow subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event, returning how many subscribers received it
    pub fn publish(&self, event: SearchEvent) -> usize {
        match self.sender.send(event) {
            Ok(count) => count,
            Err(broadcast::error::SendError(event)) => {
                trace!(event = event.name(), "No search event subscribers");
                0
            }
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = SearchEventBus::new(8);
        assert_eq!(bus.publish(SearchEvent::started("hats")), 0);
        assert!(!bus.has_subscribers());
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let bus = SearchEventBus::new(8);
        let mut rx = bus.subscribe();
        assert_eq!(bus.publish(SearchEvent::completed("hats", 3, false)), 1);

        match rx.recv().await {
            Ok(SearchEvent::Completed {
                query,
                result_count,
                from_cache,
                ..
            }) => {
                assert_eq!(query, "hats");
                assert_eq!(result_count, 3);
                assert!(!from_cache);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
