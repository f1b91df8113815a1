//! Fragment routing state machine.
//!
//! The [`Router`] owns the association between the URL fragment, the
//! active chapter, and the active sidebar entry. It consumes explicit
//! [`NavEvent`]s (startup, fragment changes, sidebar clicks) through a
//! single transition function, keeping the state machine testable
//! independent of any host page.

use tome_catalog::Catalog;

use crate::loader::{ChapterLoader, LoadOutcome};
use crate::surface::{EntryId, Surface};

/// Navigation event consumed by the router.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavEvent {
    /// First dispatch after the page loads.
    Startup,
    /// The URL fragment changed (back/forward navigation, manual edits,
    /// or a rewritten internal link).
    FragmentChanged,
    /// A sidebar entry for the chapter with this navigation key was
    /// activated.
    SidebarClicked(String),
}

/// Router state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouterState {
    /// No dispatch has happened yet.
    Uninitialized,
    /// A chapter (or one of its notices) is displayed.
    Displaying {
        /// Catalog position of the displayed chapter.
        chapter: usize,
    },
    /// The last dispatch for a chapter failed; the failure is displayed.
    Error {
        /// Catalog position of the failing chapter.
        chapter: usize,
        /// Human-readable cause, as shown in the content area.
        cause: String,
    },
}

/// Process-wide navigation state, owned by the router for the page
/// lifetime. Exactly one chapter is active at a time once loading has
/// begun.
#[derive(Debug, Default)]
pub struct NavigationState {
    current_fragment: String,
    active_chapter: Option<usize>,
    active_entry: Option<EntryId>,
}

impl NavigationState {
    /// Mirror of the URL fragment at the last dispatch.
    #[must_use]
    pub fn current_fragment(&self) -> &str {
        &self.current_fragment
    }

    /// Catalog position of the chapter currently displayed, if any.
    #[must_use]
    pub fn active_chapter(&self) -> Option<usize> {
        self.active_chapter
    }

    /// Sidebar entry currently marked active, if any.
    #[must_use]
    pub fn active_entry(&self) -> Option<EntryId> {
        self.active_entry
    }
}

/// Fragment router: one transition function over explicit events, one
/// loader dispatch per transition.
pub struct Router {
    catalog: Catalog,
    loader: ChapterLoader,
    /// Navigation key → sidebar entry, in catalog order. Empty when the
    /// sidebar mount is absent.
    entries: Vec<(String, EntryId)>,
    nav: NavigationState,
    state: RouterState,
}

impl Router {
    /// Create a router over a catalog and a loader. Sidebar entries are
    /// wired separately because the sidebar may be absent.
    #[must_use]
    pub fn new(catalog: Catalog, loader: ChapterLoader) -> Self {
        Self {
            catalog,
            loader,
            entries: Vec::new(),
            nav: NavigationState::default(),
            state: RouterState::Uninitialized,
        }
    }

    /// Wire the sidebar entries built by
    /// [`sidebar::build`](crate::sidebar::build).
    #[must_use]
    pub fn with_sidebar_entries(mut self, entries: Vec<(String, EntryId)>) -> Self {
        self.entries = entries;
        self
    }

    /// The catalog this router routes over.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current router state.
    #[must_use]
    pub fn state(&self) -> &RouterState {
        &self.state
    }

    /// Current navigation state.
    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    /// Process one navigation event.
    ///
    /// Startup and fragment changes share one resolution path: a
    /// non-empty fragment matching a chapter's navigation key selects
    /// that chapter, anything else selects the catalog's first entry.
    /// This makes back/forward navigation and manual fragment edits
    /// behave identically to startup.
    pub fn handle(&mut self, event: NavEvent, surface: &mut dyn Surface) {
        match event {
            NavEvent::Startup | NavEvent::FragmentChanged => {
                let fragment = surface.fragment();
                let position = self.resolve(&fragment);
                self.dispatch(position, surface);
            }
            NavEvent::SidebarClicked(key) => {
                let Some(position) = self.catalog.position_of(&key) else {
                    tracing::warn!(key = %key, "Sidebar click for unknown navigation key");
                    return;
                };
                if surface.fragment() == key {
                    // Fragment-change events do not fire when the
                    // fragment is unchanged; force the reload directly.
                    self.dispatch(position, surface);
                } else {
                    surface.set_fragment(&key);
                    // Headless analogue of the fragment-change event the
                    // host page would fire.
                    self.handle(NavEvent::FragmentChanged, surface);
                }
            }
        }
    }

    /// Fragment → catalog position. Unrecognized or absent fragments
    /// default to the first catalog entry.
    fn resolve(&self, fragment: &str) -> usize {
        if !fragment.is_empty()
            && let Some(position) = self.catalog.position_of(fragment)
        {
            return position;
        }
        0
    }

    fn dispatch(&mut self, position: usize, surface: &mut dyn Surface) {
        let Some(chapter) = self.catalog.get(position) else {
            return;
        };
        let entry = lookup_entry(&self.entries, &chapter.navigation_key);

        let outcome = self.loader.load(chapter, &self.catalog, surface, entry);

        self.nav.current_fragment = surface.fragment();
        self.nav.active_chapter = Some(position);
        self.nav.active_entry = entry;
        self.state = match outcome {
            LoadOutcome::FetchFailed(cause)
            | LoadOutcome::RenderFailed(cause)
            | LoadOutcome::MountMissing(cause) => RouterState::Error {
                chapter: position,
                cause,
            },
            LoadOutcome::Displayed
            | LoadOutcome::DisplayedRaw
            | LoadOutcome::EmptyContent
            | LoadOutcome::EmptyRender => RouterState::Displaying { chapter: position },
        };
    }
}

fn lookup_entry(entries: &[(String, EntryId)], key: &str) -> Option<EntryId> {
    entries.iter().find(|(k, _)| k == key).map(|&(_, id)| id)
}
