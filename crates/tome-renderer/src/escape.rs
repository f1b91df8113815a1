//! HTML escaping helpers.
//!
//! Used by the emitter for text content and attributes, by the loader's
//! degraded raw-text path, and by post-processors that need to recover
//! the original source from escaped markup.

/// Escape a string for inclusion in HTML text or attribute context.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Reverse [`escape_html`]. Only the five entities that function emits are
/// recognized; anything else passes through untouched.
#[must_use]
pub fn unescape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let replaced = [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&quot;", '"'),
            ("&#x27;", '\''),
        ]
        .iter()
        .find_map(|(entity, ch)| rest.strip_prefix(entity).map(|tail| (tail, *ch)));

        match replaced {
            Some((tail, ch)) => {
                result.push(ch);
                rest = tail;
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    result
}
