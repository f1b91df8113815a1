//! Optional collaborator wiring.
//!
//! The renderer, diagram renderer and highlighter may each be absent;
//! every absence has a defined degraded behavior in the loader. The
//! fetcher is the one mandatory collaborator.

use tome_diagrams::RenderDiagram;
use tome_fetch::Fetch;
use tome_renderer::Render;

/// Syntax-highlighting collaborator.
///
/// Consumes one code block that is not a diagram region and returns full
/// replacement markup for it, or `None` to leave the block untouched
/// (unknown language, internal failure). Failures never abort a chapter.
pub trait Highlight: Send + Sync {
    /// Annotate one code block. `language` is the fence tag, if any;
    /// `code` is the raw (unescaped) source.
    fn highlight(&self, language: Option<&str>, code: &str) -> Option<String>;
}

/// The loader's injected collaborators.
pub struct Collaborators {
    pub(crate) fetch: Box<dyn Fetch>,
    pub(crate) render: Option<Box<dyn Render>>,
    pub(crate) diagrams: Option<Box<dyn RenderDiagram>>,
    pub(crate) highlight: Option<Box<dyn Highlight>>,
}

impl Collaborators {
    /// Start with the mandatory content fetcher; everything else is
    /// absent until wired in.
    #[must_use]
    pub fn new(fetch: Box<dyn Fetch>) -> Self {
        Self {
            fetch,
            render: None,
            diagrams: None,
            highlight: None,
        }
    }

    /// Wire the markdown renderer.
    #[must_use]
    pub fn with_render(mut self, render: Box<dyn Render>) -> Self {
        self.render = Some(render);
        self
    }

    /// Wire the diagram renderer.
    #[must_use]
    pub fn with_diagrams(mut self, diagrams: Box<dyn RenderDiagram>) -> Self {
        self.diagrams = Some(diagrams);
        self
    }

    /// Wire the syntax highlighter.
    #[must_use]
    pub fn with_highlight(mut self, highlight: Box<dyn Highlight>) -> Self {
        self.highlight = Some(highlight);
        self
    }

    /// Log which collaborators are wired. Called once at startup so a
    /// misconfigured deployment is visible in the diagnostics channel.
    pub fn log_availability(&self) {
        if self.render.is_none() {
            tracing::warn!("Content renderer not wired; chapters will display as raw text");
        }
        if self.diagrams.is_none() {
            tracing::info!("Diagram rendering not wired; diagram fences stay as code blocks");
        }
        if self.highlight.is_none() {
            tracing::info!("Syntax highlighting not wired");
        }
    }
}
