//! Compiled patterns used by the query sanitizer
//!
//! All patterns are compiled once on first use. The `regex` crate runs in
//! linear time, so adversarial input cannot trigger catastrophic backtracking.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

/// Payloads that cause a query to be rejected outright.
///
/// Whitespace is tolerated before the `:`, `(` or `=` that makes each one
/// executable, since browsers ignore it too.
pub(super) static DENYLIST: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)javascript\s*:",
        r"(?i)vbscript\s*:",
        r"(?i)\bdata\s*:",
        r"(?i)\bon[a-z]{3,}\s*=",
        r"(?i)<\s*script",
        r"(?i)\beval\s*\(",
        r"(?i)\bexpression\s*\(",
    ])
    .expect("Invalid denylist regex")
});

/// Human-readable names for `DENYLIST`, index-aligned
pub(super) const DENYLIST_NAMES: [&str; 7] = [
    "javascript: scheme",
    "vbscript: scheme",
    "data: scheme",
    "inline event handler",
    "script tag",
    "eval call",
    "css expression",
];

/// Any HTML tag, opening or closing
pub(super) static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid HTML tag regex"));

/// Characters removed after tags are stripped
pub(super) const STRIPPED_CHARS: [char; 4] = ['<', '>', '"', '\''];
