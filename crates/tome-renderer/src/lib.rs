//! Markdown conversion boundary for the Tome documentation viewer.
//!
//! The viewer treats content conversion as an opaque collaborator behind
//! the [`Render`] trait; this crate also ships [`CmarkRender`], the
//! default implementation over pulldown-cmark with GFM extensions.
//!
//! # Quick Start
//!
//! ```
//! use tome_renderer::{CmarkRender, Render};
//!
//! let renderer = CmarkRender::new();
//! let html = renderer.render("# Title\n\nHello *world*.")?;
//! assert!(html.contains("<em>world</em>"));
//! # Ok::<(), tome_renderer::RenderError>(())
//! ```

mod emitter;
mod escape;

pub use emitter::CmarkRender;
pub use escape::{escape_html, unescape_html};

/// Error converting markdown to markup.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The converter rejected the input.
    #[error("markdown conversion failed: {0}")]
    Conversion(String),
}

/// Markdown-to-markup conversion collaborator.
///
/// Input is raw markdown-formatted text; output is a markup string. The
/// collaborator may be absent altogether; the loader then degrades to
/// escaped preformatted text.
pub trait Render: Send + Sync {
    /// Convert markdown text to markup.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the input cannot be converted.
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}
