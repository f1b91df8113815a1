//! Diagram region handling for the Tome documentation viewer.
//!
//! Diagrams arrive in rendered chapter markup in one of two shapes:
//! pre-tagged `div.diagram` containers, or fenced code blocks carrying a
//! diagram-language tag. [`normalize_fences`] rewrites the latter into
//! the former; [`render_regions`] then draws every container that has not
//! been processed yet, marking each with `data-processed` so re-invoking
//! on already-rendered markup is a no-op.
//!
//! The drawing algorithm itself lives behind the [`RenderDiagram`] trait;
//! [`KrokiDiagrams`] is the HTTP implementation inlining SVG from a Kroki
//! server.

mod kroki;
mod language;
mod markup;

pub use kroki::KrokiDiagrams;
pub use language::DiagramLanguage;
pub use markup::{RegionOutcome, normalize_fences, render_regions};

/// Error rendering a single diagram.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// The diagram service responded with an error.
    #[error("HTTP error: {0}")]
    Http(String),
    /// The response body could not be read.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Diagram drawing collaborator.
///
/// Consumes one diagram source and returns markup (typically inline SVG)
/// to place inside the diagram container. May be absent altogether; the
/// loader then leaves containers untouched.
pub trait RenderDiagram: Send + Sync {
    /// Draw one diagram.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError`] when the diagram cannot be drawn; the
    /// caller degrades (logs and keeps the source visible) rather than
    /// failing the chapter.
    fn render(&self, language: DiagramLanguage, source: &str) -> Result<String, DiagramError>;
}
