//! Link rewriting over rendered chapter markup.
//!
//! Intra-catalog `.md` references become fragment links so activating
//! them re-enters the router through the fragment-change path, never a
//! direct call into the loader. External references are marked to open
//! in a new browsing context with no opener back-reference. Fragment-only
//! links pass through to native in-page anchor behavior.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tome_catalog::Catalog;

/// Opening anchor tag up to and including its `href` attribute.
static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a href="([^"]*)""#).expect("anchor pattern is valid")
});

/// Attributes that open a link in a new context without an opener
/// back-reference.
const NEW_CONTEXT_ATTRS: &str = r#" target="_blank" rel="noopener noreferrer""#;

/// Rewrite every hyperlink in `html` against the catalog.
#[must_use]
pub fn rewrite(html: &str, catalog: &Catalog) -> String {
    ANCHOR_HREF
        .replace_all(html, |caps: &Captures<'_>| rewrite_one(&caps[0], &caps[1], catalog))
        .into_owned()
}

fn rewrite_one(original: &str, href: &str, catalog: &Catalog) -> String {
    // In-page anchors keep native behavior.
    if href.starts_with('#') {
        return original.to_owned();
    }

    if href.ends_with(".md") {
        let file_name = href.rsplit('/').next().unwrap_or(href);
        if let Some(chapter) = catalog.by_source_name(file_name) {
            return format!(r##"<a href="#{}""##, chapter.navigation_key);
        }
        // A .md reference outside the catalog: external ones open in a
        // new context, local ones keep default behavior.
        if is_external(href) {
            return format!(r#"<a href="{href}"{NEW_CONTEXT_ATTRS}"#);
        }
        return original.to_owned();
    }

    if is_external(href) {
        return format!(r#"<a href="{href}"{NEW_CONTEXT_ATTRS}"#);
    }

    original.to_owned()
}

fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_sources("chapters", ["00_index.md", "02_setup_.md"]).unwrap()
    }

    #[test]
    fn test_catalog_link_becomes_fragment() {
        let html = r#"<p><a href="02_setup_.md">setup</a></p>"#;
        assert_eq!(
            rewrite(html, &catalog()),
            r##"<p><a href="#02_setup_">setup</a></p>"##
        );
    }

    #[test]
    fn test_catalog_link_with_path_matches_filename() {
        let html = r#"<a href="chapters/02_setup_.md">setup</a>"#;
        assert_eq!(
            rewrite(html, &catalog()),
            r##"<a href="#02_setup_">setup</a>"##
        );
    }

    #[test]
    fn test_external_md_opens_new_context() {
        let html = r#"<a href="https://example.com/notes.md">notes</a>"#;
        assert_eq!(
            rewrite(html, &catalog()),
            r#"<a href="https://example.com/notes.md" target="_blank" rel="noopener noreferrer">notes</a>"#
        );
    }

    #[test]
    fn test_external_link_opens_new_context() {
        let html = r#"<a href="https://example.com/">site</a>"#;
        assert_eq!(
            rewrite(html, &catalog()),
            r#"<a href="https://example.com/" target="_blank" rel="noopener noreferrer">site</a>"#
        );
    }

    #[test]
    fn test_fragment_only_link_untouched() {
        let html = r##"<a href="#section-2">jump</a>"##;
        assert_eq!(rewrite(html, &catalog()), html);
    }

    #[test]
    fn test_local_non_md_link_untouched() {
        let html = r#"<a href="image.png">img</a>"#;
        assert_eq!(rewrite(html, &catalog()), html);
    }

    #[test]
    fn test_local_md_outside_catalog_untouched() {
        let html = r#"<a href="notes/unlisted.md">x</a>"#;
        assert_eq!(rewrite(html, &catalog()), html);
    }

    #[test]
    fn test_rewrites_every_link() {
        let html = r#"<a href="02_setup_.md">a</a> and <a href="http://x.test/">b</a>"#;
        let out = rewrite(html, &catalog());
        assert!(out.contains(r##"href="#02_setup_""##));
        assert!(out.contains("noopener"));
    }
}
