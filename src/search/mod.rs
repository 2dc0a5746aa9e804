//! Product search against the storefront suggest endpoint
//!
//! The orchestrator wires the sanitizer, debouncer, result cache and suggest
//! client together and exposes the resulting state machine through events
//! and render callbacks.

pub mod client;
pub mod errors;
pub mod events;
pub mod history;
pub mod orchestrator;
pub mod response;
pub mod state;

pub use client::{HttpSuggestClient, SuggestClient, SuggestFuture};
pub use errors::{ErrorKind, SearchError, SearchResult};
pub use events::{SearchEvent, SearchEventBus};
pub use history::SearchHistory;
pub use orchestrator::{ResultCallback, SearchOrchestrator, SearchOutcome};
pub use response::{ProductSummary, ResultLimit, normalize_product, parse_suggest_response};
pub use state::SearchState;
