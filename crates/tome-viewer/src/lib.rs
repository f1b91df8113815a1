//! Navigation and content-loading pipeline for the Tome documentation viewer.
//!
//! This crate is the viewer's state-machine core:
//! - [`Router`]: owns the association between the URL fragment, the active
//!   chapter, and the active sidebar entry; consumes explicit [`NavEvent`]s.
//! - [`ChapterLoader`]: orchestrates fetch → render → rewrite → display →
//!   decorate for one chapter, handling every failure path in place.
//! - [`links`]: rewrites intra-catalog references to router-driven
//!   navigation and marks external references to open in a new context.
//! - [`sidebar`]: materializes the catalog into navigation entries.
//! - [`Surface`]: the host-page boundary (content mount, sidebar mount,
//!   URL fragment), with [`MemorySurface`] for tests and headless use.
//!
//! Everything runs single-threaded and synchronously: a dispatch runs to
//! completion before the next one can begin, so loader step sequences for
//! one navigation state never interleave.

mod collab;
pub mod links;
mod loader;
mod router;
pub mod sidebar;
mod surface;

pub use collab::{Collaborators, Highlight};
pub use loader::{ChapterLoader, LoadOutcome};
pub use router::{NavEvent, NavigationState, Router, RouterState};
pub use surface::{EntryId, MemorySurface, MountError, SidebarEntry, Surface};

/// Markup shown when no chapters are configured (empty catalog).
///
/// Callers that hit [`tome_catalog::CatalogError::Empty`] place this in
/// the content mount instead of starting a router.
#[must_use]
pub fn no_content_markup() -> &'static str {
    "<p>No documentation chapters configured.</p>"
}
