//! Local search result caching
//!
//! `ResultCache` keeps suggest results keyed by normalized query text in a
//! `KeyValueStore`, with per-entry expiry and a bounded entry count.

pub mod clock;
pub mod result_cache;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use result_cache::{ResultCache, SearchCacheEntry, cache_key};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
