//! Free-text search query sanitization
//!
//! A query is rejected when it carries a script-injection payload anywhere in
//! the raw input. Otherwise HTML markup and quote characters are stripped,
//! whitespace is collapsed, and the result is checked against length bounds.
//!
//! The denylist runs before stripping: `"<script>alert(1)</script>shoes"` is
//! rejected, while `"<b>shoes</b>"` becomes `"shoes"`.

mod patterns;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::{MAX_QUERY_CHARS, MIN_QUERY_CHARS, collapse_whitespace, safe_truncate_chars};
use patterns::{DENYLIST, DENYLIST_NAMES, HTML_TAG, STRIPPED_CHARS};

/// Why a query was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationReason {
    /// Matched a denylisted scheme or keyword
    Dangerous,
    /// Shorter than the minimum after sanitization
    TooShort,
    /// Longer than the maximum after sanitization
    TooLong,
}

impl ValidationReason {
    /// Message suitable for showing next to the search box
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            ValidationReason::Dangerous => "Please enter a valid search term.",
            ValidationReason::TooShort => "Please enter at least 2 characters to search.",
            ValidationReason::TooLong => "Your search is too long. Please shorten it and try again.",
        }
    }
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValidationReason::Dangerous => "dangerous input",
            ValidationReason::TooShort => "too short",
            ValidationReason::TooLong => "too long",
        };
        f.write_str(name)
    }
}

/// Outcome of sanitizing one raw query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sanitized {
    pub valid: bool,
    /// Cleaned text; empty when the input was rejected as dangerous
    pub sanitized: String,
    pub reason: Option<ValidationReason>,
}

impl Sanitized {
    fn accepted(sanitized: String) -> Self {
        Self {
            valid: true,
            sanitized,
            reason: None,
        }
    }

    fn rejected(sanitized: String, reason: ValidationReason) -> Self {
        Self {
            valid: false,
            sanitized,
            reason: Some(reason),
        }
    }

    /// Convert into a `Result`, keeping the cleaned text on success
    pub fn into_result(self) -> Result<String, ValidationReason> {
        match self.reason {
            None => Ok(self.sanitized),
            Some(reason) => Err(reason),
        }
    }
}

/// Query sanitizer with configurable length bounds
#[derive(Debug, Clone, Copy)]
pub struct QuerySanitizer {
    min_chars: usize,
    max_chars: usize,
}

impl Default for QuerySanitizer {
    fn default() -> Self {
        Self::new(MIN_QUERY_CHARS, MAX_QUERY_CHARS)
    }
}

impl QuerySanitizer {
    #[must_use]
    pub fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
        }
    }

    /// Sanitize a raw query. Pure: no I/O, no shared state.
    #[must_use]
    pub fn sanitize(&self, raw: &str) -> Sanitized {
        if let Some(index) = DENYLIST.matches(raw).iter().next() {
            debug!(
                pattern = DENYLIST_NAMES[index],
                preview = safe_truncate_chars(raw, 40),
                "Rejected search query"
            );
            return Sanitized::rejected(String::new(), ValidationReason::Dangerous);
        }

        let without_tags = HTML_TAG.replace_all(raw, "");
        let without_chars: String = without_tags
            .chars()
            .filter(|c| !STRIPPED_CHARS.contains(c))
            .collect();
        let cleaned = collapse_whitespace(&without_chars);

        let len = cleaned.chars().count();
        if len < self.min_chars {
            return Sanitized::rejected(cleaned, ValidationReason::TooShort);
        }
        if len > self.max_chars {
            return Sanitized::rejected(cleaned, ValidationReason::TooLong);
        }
        Sanitized::accepted(cleaned)
    }
}

/// Sanitize with the default 2..=256 character bounds
#[must_use]
pub fn sanitize(raw: &str) -> Sanitized {
    QuerySanitizer::default().sanitize(raw)
}
