//! UTF-8-safe string helpers shared by the sanitizer, cache and logging

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// Never panics on multi-byte characters.
///
/// # Examples
/// ```
/// # use storefront_search::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Collapse every run of Unicode whitespace to a single space and trim the ends.
///
/// ```
/// # use storefront_search::utils::string_utils::collapse_whitespace;
/// assert_eq!(collapse_whitespace("  red \t\n shoes "), "red shoes");
/// ```
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize free text into a lookup key: whitespace-collapsed and case-folded.
///
/// "Shoes " and "shoes" produce the same key.
#[must_use]
pub fn fold_key(s: &str) -> String {
    collapse_whitespace(s).to_lowercase()
}
