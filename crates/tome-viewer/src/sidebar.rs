//! Sidebar construction.
//!
//! Runs once at startup: one navigation entry per chapter, in catalog
//! order, addressed by `#` + navigation key. Entry activation must go
//! through [`NavEvent::SidebarClicked`](crate::NavEvent::SidebarClicked)
//! rather than the host page's default jump-to-anchor behavior.

use tome_catalog::Catalog;

use crate::surface::{EntryId, MountError, Surface};

/// Materialize the catalog into sidebar entries.
///
/// Returns the navigation-key → entry pairs the router needs for
/// active-link bookkeeping, in catalog order.
///
/// # Errors
///
/// Returns [`MountError`] when the sidebar mount is absent. This is a
/// diagnostic, not a fatal condition: the caller reports it and runs the
/// content pipeline without a sidebar.
pub fn build(
    catalog: &Catalog,
    surface: &mut dyn Surface,
) -> Result<Vec<(String, EntryId)>, MountError> {
    let mut entries = Vec::with_capacity(catalog.len());
    for chapter in catalog {
        let fragment = format!("#{}", chapter.navigation_key);
        let id = surface.add_sidebar_entry(&chapter.display_title, &fragment)?;
        entries.push((chapter.navigation_key.clone(), id));
    }
    Ok(entries)
}

/// [`build`] variant that reports a missing sidebar to the diagnostics
/// channel and degrades to an empty entry list.
#[must_use]
pub fn build_or_report(catalog: &Catalog, surface: &mut dyn Surface) -> Vec<(String, EntryId)> {
    match build(catalog, surface) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("{e}; navigation will be fragment-only");
            Vec::new()
        }
    }
}
