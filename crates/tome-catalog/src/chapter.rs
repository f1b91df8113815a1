//! Chapter value type and identifier derivations.
//!
//! All derivations are small pure functions so the catalog builder, the
//! sidebar and the router share exactly one definition of each rule.

use serde::Serialize;

/// Fixed label for the designated home/overview chapter.
pub(crate) const HOME_TITLE: &str = "Home / Overview";

/// One markdown document plus its derived display and routing metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Chapter {
    /// Source identifier as configured (e.g., `"01_getting_started.md"`).
    /// Unique across the catalog.
    #[serde(rename = "sourceId")]
    pub source_id: String,
    /// Resolved location the loader fetches from
    /// (e.g., `"chapters/01_getting_started.md"`).
    #[serde(rename = "contentPath")]
    pub content_path: String,
    /// Human-readable title derived from the source identifier.
    #[serde(rename = "displayTitle")]
    pub display_title: String,
    /// URL-fragment-safe routing key. Unique across the catalog.
    #[serde(rename = "navigationKey")]
    pub navigation_key: String,
}

/// Derive the navigation key for a source identifier.
///
/// Strips the `.md` extension, then removes every character that is not
/// alphanumeric, a hyphen, or an underscore. This is the sole routing key
/// derivation; catalog build, sidebar build, and router lookup all call it.
///
/// # Examples
///
/// ```
/// use tome_catalog::navigation_key;
///
/// assert_eq!(navigation_key("01_openapi_specification_.md"), "01_openapi_specification_");
/// assert_eq!(navigation_key("a b/c.md"), "abc");
/// ```
#[must_use]
pub fn navigation_key(source_id: &str) -> String {
    strip_md(source_id)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Strip a trailing `.md` extension, if present.
fn strip_md(source_id: &str) -> &str {
    source_id.strip_suffix(".md").unwrap_or(source_id)
}

/// Leading numeric prefix of two or more digits, parsed as an integer.
///
/// `"07_api.md"` carries prefix 7; `"7_api.md"` (single digit) carries none.
pub(crate) fn numeric_prefix(source_id: &str) -> Option<u64> {
    let digits: String = source_id.chars().take_while(char::is_ascii_digit).collect();
    if digits.len() < 2 {
        return None;
    }
    digits.parse().ok()
}

/// Whether the identifier denotes the designated index/overview document.
///
/// True when, after dropping the numeric prefix and extension, the name
/// is exactly `index` (`"index.md"`, `"00_index.md"`, ...).
pub(crate) fn is_home(source_id: &str) -> bool {
    strip_prefix_and_md(source_id) == "index"
}

/// Base title text: numeric prefix and separator stripped, extension
/// stripped, word separators replaced with spaces, each word title-cased.
pub(crate) fn base_title(source_id: &str) -> String {
    let words: Vec<String> = strip_prefix_and_md(source_id)
        .replace('_', " ")
        .split_whitespace()
        .map(title_case_word)
        .collect();
    words.join(" ")
}

/// Strip a `^\d{2,}_` prefix and the `.md` extension.
fn strip_prefix_and_md(source_id: &str) -> &str {
    let name = strip_md(source_id);
    let digits = name.chars().take_while(char::is_ascii_digit).count();
    if digits >= 2 && name[digits..].starts_with('_') {
        &name[digits + 1..]
    } else {
        name
    }
}

/// Uppercase the first character, lowercase the rest.
fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_navigation_key_strips_extension() {
        assert_eq!(navigation_key("guide.md"), "guide");
    }

    #[test]
    fn test_navigation_key_keeps_digits_hyphens_underscores() {
        assert_eq!(navigation_key("01_a-b_c.md"), "01_a-b_c");
    }

    #[test]
    fn test_navigation_key_removes_unsafe_characters() {
        assert_eq!(navigation_key("API (v2)!.md"), "APIv2");
        assert_eq!(navigation_key("a/b c.md"), "abc");
    }

    #[test]
    fn test_numeric_prefix_requires_two_digits() {
        assert_eq!(numeric_prefix("07_api.md"), Some(7));
        assert_eq!(numeric_prefix("123_x.md"), Some(123));
        assert_eq!(numeric_prefix("7_api.md"), None);
        assert_eq!(numeric_prefix("api.md"), None);
    }

    #[test]
    fn test_numeric_prefix_without_separator() {
        // The prefix does not require an underscore after the digits.
        assert_eq!(numeric_prefix("42answer.md"), Some(42));
    }

    #[test]
    fn test_is_home() {
        assert!(is_home("index.md"));
        assert!(is_home("00_index.md"));
        assert!(is_home("000_index.md"));
        assert!(!is_home("01_index_handling.md"));
        assert!(!is_home("guide.md"));
    }

    #[test]
    fn test_base_title_words() {
        assert_eq!(base_title("01_openapi_specification_.md"), "Openapi Specification");
        assert_eq!(base_title("06_request___response_data_handling_.md"), "Request Response Data Handling");
    }

    #[test]
    fn test_base_title_without_prefix() {
        assert_eq!(base_title("getting_started.md"), "Getting Started");
    }

    #[test]
    fn test_base_title_lowers_shouting_words() {
        assert_eq!(base_title("02_HTTP_basics.md"), "Http Basics");
    }
}
