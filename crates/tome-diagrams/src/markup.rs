//! Diagram container normalization and idempotent rendering over markup.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tome_renderer::unescape_html;

use crate::{DiagramLanguage, RenderDiagram};

/// Fenced code block with a language class, as produced by the renderer.
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<pre><code class="language-([a-zA-Z0-9_-]+)">(.*?)</code></pre>"#)
        .expect("fence pattern is valid")
});

/// Unprocessed diagram container. A processed container carries a
/// `data-processed` attribute after the language tag and never matches.
static REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div class="diagram" data-diagram-lang="([a-z0-9-]+)">(.*?)</div>"#)
        .expect("region pattern is valid")
});

/// Result of one [`render_regions`] pass.
#[derive(Debug, Default)]
pub struct RegionOutcome {
    /// Markup with every renderable region replaced in place.
    pub html: String,
    /// Number of regions drawn in this pass.
    pub rendered: usize,
    /// Per-region failures; the affected containers keep their source.
    pub warnings: Vec<String>,
}

/// Rewrite fenced code blocks tagged with a diagram language into
/// `div.diagram` containers.
///
/// Code fences with non-diagram languages are left untouched. The source
/// stays HTML-escaped inside the container until it is drawn.
#[must_use]
pub fn normalize_fences(html: &str) -> String {
    FENCE
        .replace_all(html, |caps: &Captures<'_>| {
            let Some(language) = DiagramLanguage::parse(&caps[1]) else {
                return caps[0].to_owned();
            };
            format!(
                r#"<div class="diagram" data-diagram-lang="{}">{}</div>"#,
                language.tag(),
                &caps[2]
            )
        })
        .into_owned()
}

/// Draw every unprocessed diagram container in `html`.
///
/// Each drawn container is marked with `data-processed="true"`, so a
/// second pass over the same markup renders nothing: re-invocation on
/// already-rendered regions is a no-op by construction. Containers whose
/// rendering fails are left as-is with a warning recorded.
#[must_use]
pub fn render_regions(html: &str, renderer: &dyn RenderDiagram) -> RegionOutcome {
    let mut rendered = 0;
    let mut warnings = Vec::new();

    let out = REGION.replace_all(html, |caps: &Captures<'_>| {
        let tag = &caps[1];
        let Some(language) = DiagramLanguage::parse(tag) else {
            // Unknown tag in a hand-written container; leave it alone.
            return caps[0].to_owned();
        };

        let source = unescape_html(caps[2].trim());
        match renderer.render(language, &source) {
            Ok(svg) => {
                rendered += 1;
                format!(
                    r#"<div class="diagram" data-diagram-lang="{tag}" data-processed="true">{svg}</div>"#
                )
            }
            Err(e) => {
                warnings.push(format!("{tag} diagram failed to render: {e}"));
                caps[0].to_owned()
            }
        }
    });

    RegionOutcome {
        html: out.into_owned(),
        rendered,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::DiagramError;

    /// Draws every diagram as a fixed SVG stub; records nothing.
    struct StubDiagrams;

    impl RenderDiagram for StubDiagrams {
        fn render(&self, _language: DiagramLanguage, source: &str) -> Result<String, DiagramError> {
            Ok(format!("<svg>{}</svg>", source.len()))
        }
    }

    /// Always fails.
    struct BrokenDiagrams;

    impl RenderDiagram for BrokenDiagrams {
        fn render(&self, _language: DiagramLanguage, _source: &str) -> Result<String, DiagramError> {
            Err(DiagramError::Http("HTTP 500: boom".to_owned()))
        }
    }

    #[test]
    fn test_normalize_diagram_fence() {
        let html = r#"<pre><code class="language-mermaid">graph TD;</code></pre>"#;
        assert_eq!(
            normalize_fences(html),
            r#"<div class="diagram" data-diagram-lang="mermaid">graph TD;</div>"#
        );
    }

    #[test]
    fn test_normalize_leaves_code_fences() {
        let html = r#"<pre><code class="language-rust">fn main() {}</code></pre>"#;
        assert_eq!(normalize_fences(html), html);
    }

    #[test]
    fn test_normalize_dot_alias_uses_canonical_tag() {
        let html = r#"<pre><code class="language-dot">digraph {}</code></pre>"#;
        assert_eq!(
            normalize_fences(html),
            r#"<div class="diagram" data-diagram-lang="graphviz">digraph {}</div>"#
        );
    }

    #[test]
    fn test_render_marks_processed() {
        let html = r#"<div class="diagram" data-diagram-lang="mermaid">graph TD;</div>"#;
        let outcome = render_regions(html, &StubDiagrams);

        assert_eq!(outcome.rendered, 1);
        assert!(outcome.html.contains(r#"data-processed="true""#));
        assert!(outcome.html.contains("<svg>"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let html = r#"<div class="diagram" data-diagram-lang="mermaid">graph TD;</div>"#;
        let first = render_regions(html, &StubDiagrams);
        let second = render_regions(&first.html, &StubDiagrams);

        assert_eq!(second.rendered, 0);
        assert!(second.warnings.is_empty());
        assert_eq!(second.html, first.html);
    }

    #[test]
    fn test_render_unescapes_source() {
        let html = r#"<div class="diagram" data-diagram-lang="mermaid">A --&gt; B</div>"#;
        // "A --> B" is 7 chars; the stub renders the source length.
        let outcome = render_regions(html, &StubDiagrams);
        assert!(outcome.html.contains("<svg>7</svg>"));
    }

    #[test]
    fn test_render_failure_keeps_source_and_warns() {
        let html = r#"<div class="diagram" data-diagram-lang="mermaid">graph TD;</div>"#;
        let outcome = render_regions(html, &BrokenDiagrams);

        assert_eq!(outcome.rendered, 0);
        assert_eq!(outcome.html, html);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("HTTP 500"));
    }

    #[test]
    fn test_normalize_then_render_pipeline() {
        let html = "<p>before</p>\
                    <pre><code class=\"language-mermaid\">graph TD;</code></pre>\
                    <pre><code class=\"language-rust\">fn x() {}</code></pre>";
        let normalized = normalize_fences(html);
        let outcome = render_regions(&normalized, &StubDiagrams);

        assert_eq!(outcome.rendered, 1);
        // The rust block is untouched and still available for highlighting.
        assert!(outcome.html.contains(r#"<code class="language-rust">"#));
    }
}
