pub mod cache;
pub mod collection;
pub mod config;
pub mod debounce;
pub mod sanitizer;
pub mod search;
pub mod utils;

pub use cache::{
    Clock, FileStore, KeyValueStore, ManualClock, MemoryStore, ResultCache, SearchCacheEntry,
    StorageError, SystemClock,
};
pub use collection::{
    CollectionView, Facet, FilterState, Product, SortKey, Variant, facet_counts, filter,
    parse_products, sort,
};
pub use config::{ConfigError, SearchConfig};
pub use debounce::Debouncer;
pub use sanitizer::{QuerySanitizer, Sanitized, ValidationReason, sanitize};
pub use search::{
    ErrorKind, HttpSuggestClient, ProductSummary, ResultLimit, SearchError, SearchEvent,
    SearchOrchestrator, SearchOutcome, SearchState, SuggestClient,
};
