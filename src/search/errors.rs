//! Error types for search operations
//!
//! Every failure the orchestrator can meet is classified into an `ErrorKind`
//! that decides the user-facing message and whether a retry is offered.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::sanitizer::ValidationReason;

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Classified failure kind, as surfaced to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Network,
    Timeout,
    RateLimit,
    Parse,
    Generic,
}

impl ErrorKind {
    /// Message shown in place of results
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Validation => "Please enter a valid search term.",
            ErrorKind::Network => {
                "Unable to connect. Check your internet connection and try again."
            }
            ErrorKind::Timeout => "Search is taking longer than expected. Please try again.",
            ErrorKind::RateLimit => "Too many searches. Please wait a moment before trying again.",
            ErrorKind::Parse | ErrorKind::Generic => {
                "Something went wrong with your search. Please try again."
            }
        }
    }

    /// Whether a retry action should be offered right away
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Parse | ErrorKind::Generic
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::RateLimit => "rate-limit",
            ErrorKind::Parse => "parse",
            ErrorKind::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// Error types for search operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Query rejected before any request was made
    #[error("Invalid search query: {0}")]
    Validation(ValidationReason),

    /// Transport failure (offline, DNS, connection reset)
    #[error("Network error: {0}")]
    Network(String),

    /// No response within the request deadline
    #[error("Search timed out after {0:?}")]
    Timeout(Duration),

    /// HTTP 429 from the search endpoint
    #[error("Rate limited by search endpoint")]
    RateLimited { retry_after: Option<Duration> },

    /// Any other non-success HTTP status
    #[error("Search endpoint returned HTTP {status}")]
    Http { status: u16 },

    /// Body was not JSON or lacked the product list
    #[error("Malformed search response: {0}")]
    Parse(String),

    /// Superseded by a newer search or torn down
    #[error("Search was cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for SearchError {
    fn from(error: serde_json::Error) -> Self {
        SearchError::Parse(error.to_string())
    }
}

impl SearchError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Validation(_) => ErrorKind::Validation,
            SearchError::Network(_) => ErrorKind::Network,
            SearchError::Timeout(_) => ErrorKind::Timeout,
            SearchError::RateLimited { .. } => ErrorKind::RateLimit,
            SearchError::Parse(_) => ErrorKind::Parse,
            SearchError::Http { .. } | SearchError::Cancelled => ErrorKind::Generic,
        }
    }

    /// User-facing message; validation errors name the exact problem
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::Validation(reason) => reason.user_message(),
            other => other.kind().user_message(),
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SearchError::Cancelled) && self.kind().is_retryable()
    }

    /// Server-provided wait before retrying, for rate limits
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SearchError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}
