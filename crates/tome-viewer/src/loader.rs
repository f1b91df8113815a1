//! Chapter loading pipeline.
//!
//! One [`ChapterLoader::load`] call runs the full fetch → render →
//! rewrite → display → decorate sequence for a single chapter. Every
//! failure is converted into user-visible in-place markup naming the
//! chapter and the cause; nothing propagates uncaught past this
//! boundary. The active sidebar marker is updated exactly once per
//! dispatch, on every outcome including failure.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tome_catalog::{Catalog, Chapter};
use tome_diagrams::{DiagramLanguage, normalize_fences, render_regions};
use tome_fetch::{FetchError, FetchResponse};
use tome_renderer::{escape_html, unescape_html};

use crate::collab::Collaborators;
use crate::links;
use crate::surface::{EntryId, MountError, Surface};

/// Code block as left in the markup after diagram normalization.
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<pre><code(?: class="language-([a-zA-Z0-9_-]+)")?>(.*?)</code></pre>"#)
        .expect("code block pattern is valid")
});

/// Terminal state of one loader dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Chapter fetched, converted and displayed.
    Displayed,
    /// Renderer absent; raw escaped text displayed with a warning.
    DisplayedRaw,
    /// Fetched body was empty or whitespace-only (notice, not an error).
    EmptyContent,
    /// Conversion produced empty markup from non-empty input (notice).
    EmptyRender,
    /// Network failure or non-success status; inline error displayed.
    FetchFailed(String),
    /// Conversion failure; inline error displayed.
    RenderFailed(String),
    /// The content mount is absent; display impossible for this dispatch.
    MountMissing(String),
}

impl LoadOutcome {
    /// Whether chapter content (full or degraded) ended up displayed.
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        matches!(self, Self::Displayed | Self::DisplayedRaw)
    }

    /// The failure cause, for error outcomes.
    #[must_use]
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::FetchFailed(c) | Self::RenderFailed(c) | Self::MountMissing(c) => Some(c),
            _ => None,
        }
    }
}

/// Orchestrates loading and displaying one chapter.
pub struct ChapterLoader {
    collab: Collaborators,
    /// Monotonic source for cache-busting query parameters.
    nonce: u64,
}

impl ChapterLoader {
    /// Create a loader around its collaborators.
    #[must_use]
    pub fn new(collab: Collaborators) -> Self {
        Self { collab, nonce: 0 }
    }

    /// Load `chapter` and display it (or a failure message) on `surface`.
    ///
    /// `entry` is the sidebar entry to mark active; the marker is updated
    /// exactly once whatever the outcome, so the sidebar never shows a
    /// stale selection. The scroll position resets only when content was
    /// actually displayed.
    pub fn load(
        &mut self,
        chapter: &Chapter,
        catalog: &Catalog,
        surface: &mut dyn Surface,
        entry: Option<EntryId>,
    ) -> LoadOutcome {
        let outcome = self.run(chapter, catalog, surface);

        surface.set_active_entry(entry);
        if outcome.is_displayed() {
            surface.scroll_content_to_top();
        }

        if let Some(cause) = outcome.cause() {
            tracing::warn!(chapter = %chapter.source_id, cause = %cause, "Chapter load failed");
        }

        outcome
    }

    fn run(
        &mut self,
        chapter: &Chapter,
        catalog: &Catalog,
        surface: &mut dyn Surface,
    ) -> LoadOutcome {
        if !surface.has_content_mount() {
            let err = MountError::content();
            tracing::error!(chapter = %chapter.source_id, "{err}");
            return LoadOutcome::MountMissing(err.to_string());
        }

        // Step 1: fetch, treating any prior cached response as stale.
        let response = match self.fetch_fresh(&chapter.content_path) {
            Ok(response) => response,
            Err(e) => {
                let _ = surface.set_content(&error_markup(chapter, &e.to_string()));
                return LoadOutcome::FetchFailed(e.to_string());
            }
        };
        if !response.is_success() {
            let cause = format!(
                "HTTP status {} for {}",
                response.status, chapter.content_path
            );
            let _ = surface.set_content(&error_markup(chapter, &cause));
            return LoadOutcome::FetchFailed(cause);
        }

        // Step 2: an empty chapter is a notice, not an error.
        if response.body.trim().is_empty() {
            let _ = surface.set_content(&format!(
                "<p>The content for this chapter ({}) appears to be empty.</p>",
                escape_html(&chapter.source_id)
            ));
            return LoadOutcome::EmptyContent;
        }

        // Step 3: convert, degrading to raw text when no renderer is wired.
        let html = match &self.collab.render {
            Some(render) => match render.render(&response.body) {
                Ok(html) => html,
                Err(e) => {
                    let _ = surface.set_content(&error_markup(chapter, &e.to_string()));
                    return LoadOutcome::RenderFailed(e.to_string());
                }
            },
            None => {
                tracing::warn!(chapter = %chapter.source_id, "Content renderer unavailable; displaying raw text");
                let _ = surface.set_content(&raw_fallback_markup(&response.body));
                return LoadOutcome::DisplayedRaw;
            }
        };

        // Step 4: non-empty input that converts to nothing is a notice.
        if html.trim().is_empty() {
            let _ = surface.set_content(&format!(
                "<p>Content parsed to empty markup for {}.</p>",
                escape_html(&chapter.source_id)
            ));
            return LoadOutcome::EmptyRender;
        }

        // Step 5: the converted chapter is visible from here on.
        let _ = surface.set_content(&html);

        // Steps 6-8 decorate the displayed markup; failures degrade
        // rather than abort, the primary content is already visible.
        let decorated = self.decorate(html, chapter, catalog);
        let _ = surface.set_content(&decorated);

        LoadOutcome::Displayed
    }

    /// Step 1 fetch policy: bypass caches; treat "not modified" as
    /// transient and retry once with a cache-busting query parameter.
    fn fetch_fresh(&mut self, path: &str) -> Result<FetchResponse, FetchError> {
        let response = self.collab.fetch.fetch(path)?;
        if !response.is_not_modified() {
            return Ok(response);
        }

        self.nonce += 1;
        let busted = format!("{path}?v={}", self.nonce);
        tracing::debug!(path = %path, "Source replied not-modified; retrying with cache-busting query");
        self.collab.fetch.fetch(&busted)
    }

    /// Steps 6-8: link rewriting, diagram rendering, syntax highlighting.
    fn decorate(&self, html: String, chapter: &Chapter, catalog: &Catalog) -> String {
        // Step 6: internal links drive the router, external ones open
        // in a new context.
        let mut html = links::rewrite(&html, catalog);

        // Step 7: normalize tagged fences into containers, then draw
        // every container not yet processed.
        if let Some(diagrams) = &self.collab.diagrams {
            let outcome = render_regions(&normalize_fences(&html), diagrams.as_ref());
            for warning in &outcome.warnings {
                tracing::warn!(chapter = %chapter.source_id, warning = %warning, "Diagram rendering degraded");
            }
            html = outcome.html;
        }

        // Step 8: highlight the remaining code blocks.
        if let Some(highlight) = &self.collab.highlight {
            html = highlight_blocks(&html, highlight.as_ref());
        }

        html
    }
}

/// Inline error naming the failing chapter and the underlying cause.
fn error_markup(chapter: &Chapter, cause: &str) -> String {
    format!(
        r#"<p class="tome-error">Error loading chapter {}: {}</p>"#,
        escape_html(&chapter.source_id),
        escape_html(cause)
    )
}

/// Degraded display when no renderer is wired: escaped raw text plus a
/// visible warning.
fn raw_fallback_markup(body: &str) -> String {
    format!(
        r#"<p class="tome-warning">Content renderer unavailable; showing raw chapter text.</p><pre>{}</pre>"#,
        escape_html(body)
    )
}

/// Run the highlighter over every code block that is not a diagram
/// region. Diagram fences are skipped even when no diagram renderer is
/// wired, so their sources are never mistaken for code.
fn highlight_blocks(html: &str, highlight: &dyn crate::collab::Highlight) -> String {
    CODE_BLOCK
        .replace_all(html, |caps: &Captures<'_>| {
            let language = caps.get(1).map(|m| m.as_str());
            if language.is_some_and(|l| DiagramLanguage::parse(l).is_some()) {
                return caps[0].to_owned();
            }
            let code = unescape_html(&caps[2]);
            match highlight.highlight(language, &code) {
                Some(markup) => markup,
                None => caps[0].to_owned(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use tome_diagrams::{DiagramError, RenderDiagram};
    use tome_fetch::MockFetch;
    use tome_renderer::{CmarkRender, Render, RenderError};

    use super::*;
    use crate::collab::Highlight;
    use crate::surface::MemorySurface;

    static_assertions::assert_impl_all!(ChapterLoader: Send);

    fn catalog() -> Catalog {
        Catalog::from_sources(
            "chapters",
            ["00_index.md", "01_intro_.md", "02_setup_.md"],
        )
        .unwrap()
    }

    fn loader(fetch: MockFetch) -> ChapterLoader {
        ChapterLoader::new(
            Collaborators::new(Box::new(fetch)).with_render(Box::new(CmarkRender::new())),
        )
    }

    fn load_chapter(
        loader: &mut ChapterLoader,
        catalog: &Catalog,
        position: usize,
        surface: &mut MemorySurface,
    ) -> LoadOutcome {
        let chapter = catalog.get(position).unwrap();
        loader.load(chapter, catalog, surface, None)
    }

    #[test]
    fn test_successful_load_displays_rendered_markup() {
        let fetch = MockFetch::new().with_page("chapters/01_intro_.md", "# Intro\n\nHello.");
        let mut loader = loader(fetch);
        let catalog = catalog();
        let mut surface = MemorySurface::new();

        let outcome = load_chapter(&mut loader, &catalog, 1, &mut surface);

        assert_eq!(outcome, LoadOutcome::Displayed);
        assert!(surface.content().contains("<p>Hello.</p>"));
        assert_eq!(surface.scroll_resets(), 1);
    }

    #[test]
    fn test_http_error_names_chapter_and_status() {
        let fetch = MockFetch::new().with_status("chapters/01_intro_.md", 500);
        let mut loader = loader(fetch);
        let catalog = catalog();
        let mut surface = MemorySurface::new();
        let entry = surface.add_sidebar_entry("1. Intro", "#01_intro_").unwrap();

        let chapter = catalog.get(1).unwrap();
        let outcome = loader.load(chapter, &catalog, &mut surface, Some(entry));

        assert!(matches!(outcome, LoadOutcome::FetchFailed(_)));
        assert!(surface.content().contains("01_intro_.md"));
        assert!(surface.content().contains("500"));
        // The clicked entry is still marked active on failure.
        assert_eq!(surface.active_entry(), Some(entry));
        assert_eq!(surface.scroll_resets(), 0);
    }

    #[test]
    fn test_transport_failure_shows_inline_error() {
        let fetch =
            MockFetch::new().with_transport_failure("chapters/01_intro_.md", "connection refused");
        let mut loader = loader(fetch);
        let catalog = catalog();
        let mut surface = MemorySurface::new();

        let outcome = load_chapter(&mut loader, &catalog, 1, &mut surface);

        assert!(matches!(outcome, LoadOutcome::FetchFailed(_)));
        assert!(surface.content().contains("Error loading chapter"));
        assert!(surface.content().contains("connection refused"));
    }

    /// Renderer that records whether it ran.
    struct CountingRender(Arc<AtomicUsize>);

    impl Render for CountingRender {
        fn render(&self, _markdown: &str) -> Result<String, RenderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok("<p>x</p>".to_owned())
        }
    }

    #[test]
    fn test_empty_body_notice_skips_renderer() {
        let fetch = MockFetch::new().with_page("chapters/01_intro_.md", "   \n  ");
        let invocations = Arc::new(AtomicUsize::new(0));
        let mut loader = ChapterLoader::new(
            Collaborators::new(Box::new(fetch))
                .with_render(Box::new(CountingRender(Arc::clone(&invocations)))),
        );
        let catalog = catalog();
        let mut surface = MemorySurface::new();

        let outcome = load_chapter(&mut loader, &catalog, 1, &mut surface);

        assert_eq!(outcome, LoadOutcome::EmptyContent);
        assert!(surface.content().contains("appears to be empty"));
        assert!(surface.content().contains("01_intro_.md"));
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_renderer_absent_degrades_to_raw_text() {
        let fetch = MockFetch::new().with_page("chapters/01_intro_.md", "# Raw <stuff>");
        let mut loader = ChapterLoader::new(Collaborators::new(Box::new(fetch)));
        let catalog = catalog();
        let mut surface = MemorySurface::new();

        let outcome = load_chapter(&mut loader, &catalog, 1, &mut surface);

        assert_eq!(outcome, LoadOutcome::DisplayedRaw);
        assert!(surface.content().contains("renderer unavailable"));
        assert!(surface.content().contains("<pre># Raw &lt;stuff&gt;</pre>"));
        assert_eq!(surface.scroll_resets(), 1);
    }

    /// Renderer that always fails.
    struct FailingRender;

    impl Render for FailingRender {
        fn render(&self, _markdown: &str) -> Result<String, RenderError> {
            Err(RenderError::Conversion("unbalanced fence".to_owned()))
        }
    }

    #[test]
    fn test_render_failure_shows_inline_error() {
        let fetch = MockFetch::new().with_page("chapters/01_intro_.md", "# x");
        let mut loader = ChapterLoader::new(
            Collaborators::new(Box::new(fetch)).with_render(Box::new(FailingRender)),
        );
        let catalog = catalog();
        let mut surface = MemorySurface::new();

        let outcome = load_chapter(&mut loader, &catalog, 1, &mut surface);

        assert!(matches!(outcome, LoadOutcome::RenderFailed(_)));
        assert!(surface.content().contains("01_intro_.md"));
        assert!(surface.content().contains("unbalanced fence"));
    }

    /// Renderer that converts everything to whitespace.
    struct BlankRender;

    impl Render for BlankRender {
        fn render(&self, _markdown: &str) -> Result<String, RenderError> {
            Ok("  \n ".to_owned())
        }
    }

    #[test]
    fn test_parsed_to_empty_notice() {
        let fetch = MockFetch::new().with_page("chapters/01_intro_.md", "some text");
        let mut loader = ChapterLoader::new(
            Collaborators::new(Box::new(fetch)).with_render(Box::new(BlankRender)),
        );
        let catalog = catalog();
        let mut surface = MemorySurface::new();

        let outcome = load_chapter(&mut loader, &catalog, 1, &mut surface);

        assert_eq!(outcome, LoadOutcome::EmptyRender);
        assert!(surface.content().contains("parsed to empty"));
    }

    #[test]
    fn test_not_modified_retries_once_with_cache_busting() {
        let fetch = MockFetch::new()
            .with_status("chapters/01_intro_.md", 304)
            .with_page("chapters/01_intro_.md?v=1", "# Fresh");
        let mut loader = loader(fetch);
        let catalog = catalog();
        let mut surface = MemorySurface::new();

        let outcome = load_chapter(&mut loader, &catalog, 1, &mut surface);

        assert_eq!(outcome, LoadOutcome::Displayed);
        assert!(surface.content().contains("Fresh"));
    }

    #[test]
    fn test_missing_content_mount_fails_dispatch_only() {
        let fetch = MockFetch::new().with_page("chapters/01_intro_.md", "# x");
        let mut loader = loader(fetch);
        let catalog = catalog();
        let mut surface = MemorySurface::new().without_content();
        let chapter = catalog.get(1).unwrap();

        let outcome = loader.load(chapter, &catalog, &mut surface, None);

        assert!(matches!(outcome, LoadOutcome::MountMissing(_)));
        // Bookkeeping still completed exactly once.
        assert_eq!(surface.active_updates(), 1);
    }

    #[test]
    fn test_active_entry_updated_exactly_once_per_dispatch() {
        let fetch = MockFetch::new().with_page("chapters/01_intro_.md", "# x");
        let mut loader = loader(fetch);
        let catalog = catalog();
        let mut surface = MemorySurface::new();

        load_chapter(&mut loader, &catalog, 1, &mut surface);
        assert_eq!(surface.active_updates(), 1);

        load_chapter(&mut loader, &catalog, 1, &mut surface);
        assert_eq!(surface.active_updates(), 2);
    }

    #[test]
    fn test_internal_links_rewritten_in_displayed_markup() {
        let fetch = MockFetch::new()
            .with_page("chapters/01_intro_.md", "See [setup](02_setup_.md).");
        let mut loader = loader(fetch);
        let catalog = catalog();
        let mut surface = MemorySurface::new();

        load_chapter(&mut loader, &catalog, 1, &mut surface);

        assert!(surface.content().contains(r##"href="#02_setup_""##));
    }

    /// Draws diagrams as a fixed stub.
    struct StubDiagrams;

    impl RenderDiagram for StubDiagrams {
        fn render(&self, _language: DiagramLanguage, _source: &str) -> Result<String, DiagramError> {
            Ok("<svg>ok</svg>".to_owned())
        }
    }

    /// Wraps code in a marker element.
    struct StubHighlight;

    impl Highlight for StubHighlight {
        fn highlight(&self, language: Option<&str>, code: &str) -> Option<String> {
            language.map(|lang| {
                format!(r#"<pre><code class="hl-{lang}">{}</code></pre>"#, code.len())
            })
        }
    }

    #[test]
    fn test_diagrams_drawn_and_code_highlighted() {
        let markdown = "```mermaid\ngraph TD;\n```\n\n```rust\nfn main() {}\n```";
        let fetch = MockFetch::new().with_page("chapters/01_intro_.md", markdown);
        let mut loader = ChapterLoader::new(
            Collaborators::new(Box::new(fetch))
                .with_render(Box::new(CmarkRender::new()))
                .with_diagrams(Box::new(StubDiagrams))
                .with_highlight(Box::new(StubHighlight)),
        );
        let catalog = catalog();
        let mut surface = MemorySurface::new();

        let outcome = load_chapter(&mut loader, &catalog, 1, &mut surface);

        assert_eq!(outcome, LoadOutcome::Displayed);
        assert!(surface.content().contains(r#"data-processed="true""#));
        assert!(surface.content().contains("<svg>ok</svg>"));
        assert!(surface.content().contains("hl-rust"));
        // The diagram source is not treated as highlightable code.
        assert!(!surface.content().contains("hl-mermaid"));
    }

    #[test]
    fn test_diagram_fence_not_highlighted_without_diagram_renderer() {
        let markdown = "```mermaid\ngraph TD;\n```";
        let fetch = MockFetch::new().with_page("chapters/01_intro_.md", markdown);
        let mut loader = ChapterLoader::new(
            Collaborators::new(Box::new(fetch))
                .with_render(Box::new(CmarkRender::new()))
                .with_highlight(Box::new(StubHighlight)),
        );
        let catalog = catalog();
        let mut surface = MemorySurface::new();

        load_chapter(&mut loader, &catalog, 1, &mut surface);

        assert!(surface.content().contains("language-mermaid"));
        assert!(!surface.content().contains("hl-mermaid"));
    }
}
