//! Shared configuration constants for storefront search
//!
//! Default values used by the config builder, the orchestrator and the cache,
//! kept in one place so the CLI and the library agree on them.

use std::time::Duration;

/// Default debounce window: 300 milliseconds
///
/// Keystrokes arriving closer together than this are coalesced into a single
/// suggest request carrying the last value typed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default request timeout: 8 seconds
///
/// The hosted suggest endpoint normally answers in well under a second; a
/// request still pending after this long surfaces as a timeout error.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Default cache entry lifetime: 5 minutes
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Maximum number of cached queries before least-recently-used eviction
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Number of recent searches kept in history
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Minimum sanitized query length, in characters
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum sanitized query length, in characters
pub const MAX_QUERY_CHARS: usize = 256;

/// Suggest result limit on narrow viewports
pub const MOBILE_RESULT_LIMIT: usize = 8;

/// Suggest result limit on wide viewports
pub const DESKTOP_RESULT_LIMIT: usize = 10;

/// Widest viewport (in CSS pixels) that still counts as mobile
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

/// Path of the hosted predictive search endpoint, relative to the store root
pub const SUGGEST_PATH: &str = "/search/suggest.json";

/// Namespace prefix for cache entries in key/value storage
pub const CACHE_KEY_PREFIX: &str = "storefront_search:cache:";

/// Storage key holding the recent search history
pub const HISTORY_KEY: &str = "storefront_search:history";

/// Capacity of the search event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// User agent sent with suggest requests
pub const USER_AGENT: &str = concat!("storefront-search/", env!("CARGO_PKG_VERSION"));
