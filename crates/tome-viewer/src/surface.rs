//! Host-page boundary.
//!
//! The host page supplies two mount points (content and sidebar) and the
//! URL fragment. [`Surface`] abstracts them so the router and loader can
//! be driven headlessly; [`MemorySurface`] is the in-memory
//! implementation used by tests and the CLI.

/// Handle to one sidebar navigation entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryId(pub(crate) usize);

/// A display region required by an operation is absent from the host page.
///
/// Reported, not fatal: an absent sidebar degrades navigation only; an
/// absent content mount makes display impossible for that dispatch only.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("mount point '{mount}' is absent from the host page")]
pub struct MountError {
    /// Which mount is missing (`"content"` or `"sidebar"`).
    pub mount: &'static str,
}

impl MountError {
    pub(crate) fn content() -> Self {
        Self { mount: "content" }
    }

    pub(crate) fn sidebar() -> Self {
        Self { mount: "sidebar" }
    }
}

/// One materialized sidebar entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarEntry {
    /// Display title shown to the reader.
    pub title: String,
    /// Link target (`#` + navigation key).
    pub fragment: String,
    /// Whether this entry is currently marked active.
    pub active: bool,
}

/// Host-page boundary: content mount, sidebar mount, URL fragment.
///
/// The fragment is the sole piece of navigable, shareable state. Mutating
/// operations take `&mut self`; the viewer is single-threaded.
pub trait Surface {
    /// Whether the content mount exists.
    fn has_content_mount(&self) -> bool;

    /// Replace the content area's markup.
    ///
    /// # Errors
    ///
    /// Returns [`MountError`] when the content mount is absent.
    fn set_content(&mut self, html: &str) -> Result<(), MountError>;

    /// Reset the content area's scroll position to the top.
    fn scroll_content_to_top(&mut self);

    /// Append a sidebar navigation entry.
    ///
    /// # Errors
    ///
    /// Returns [`MountError`] when the sidebar mount is absent.
    fn add_sidebar_entry(&mut self, title: &str, fragment: &str) -> Result<EntryId, MountError>;

    /// Mark `entry` active, clearing the previous active marker.
    /// `None` clears the marker without setting a new one.
    fn set_active_entry(&mut self, entry: Option<EntryId>);

    /// Current URL fragment, without the leading `#`.
    fn fragment(&self) -> String;

    /// Set the URL fragment (without the leading `#`).
    ///
    /// Returns `true` when the fragment actually changed. A real host page
    /// fires a fragment-change event in that case; headless drivers call
    /// the router's fragment-change transition themselves.
    fn set_fragment(&mut self, fragment: &str) -> bool;
}

/// In-memory [`Surface`] for tests and headless rendering.
#[derive(Debug)]
pub struct MemorySurface {
    has_content: bool,
    has_sidebar: bool,
    content: String,
    entries: Vec<SidebarEntry>,
    fragment: String,
    scroll_resets: usize,
    active_updates: usize,
}

impl MemorySurface {
    /// Surface with both mounts present.
    #[must_use]
    pub fn new() -> Self {
        Self {
            has_content: true,
            has_sidebar: true,
            content: String::new(),
            entries: Vec::new(),
            fragment: String::new(),
            scroll_resets: 0,
            active_updates: 0,
        }
    }

    /// Host page without a sidebar mount.
    #[must_use]
    pub fn without_sidebar(mut self) -> Self {
        self.has_sidebar = false;
        self
    }

    /// Host page without a content mount.
    #[must_use]
    pub fn without_content(mut self) -> Self {
        self.has_content = false;
        self
    }

    /// Start with a fragment already present in the URL.
    #[must_use]
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = fragment.into();
        self
    }

    /// Current content area markup.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Materialized sidebar entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[SidebarEntry] {
        &self.entries
    }

    /// The currently active entry, if any.
    #[must_use]
    pub fn active_entry(&self) -> Option<EntryId> {
        self.entries
            .iter()
            .position(|e| e.active)
            .map(EntryId)
    }

    /// How many times the scroll position was reset.
    #[must_use]
    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets
    }

    /// How many times the active marker was updated.
    #[must_use]
    pub fn active_updates(&self) -> usize {
        self.active_updates
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MemorySurface {
    fn has_content_mount(&self) -> bool {
        self.has_content
    }

    fn set_content(&mut self, html: &str) -> Result<(), MountError> {
        if !self.has_content {
            return Err(MountError::content());
        }
        self.content.clear();
        self.content.push_str(html);
        Ok(())
    }

    fn scroll_content_to_top(&mut self) {
        self.scroll_resets += 1;
    }

    fn add_sidebar_entry(&mut self, title: &str, fragment: &str) -> Result<EntryId, MountError> {
        if !self.has_sidebar {
            return Err(MountError::sidebar());
        }
        self.entries.push(SidebarEntry {
            title: title.to_owned(),
            fragment: fragment.to_owned(),
            active: false,
        });
        Ok(EntryId(self.entries.len() - 1))
    }

    fn set_active_entry(&mut self, entry: Option<EntryId>) {
        self.active_updates += 1;
        for e in &mut self.entries {
            e.active = false;
        }
        if let Some(EntryId(i)) = entry
            && let Some(e) = self.entries.get_mut(i)
        {
            e.active = true;
        }
    }

    fn fragment(&self) -> String {
        self.fragment.clone()
    }

    fn set_fragment(&mut self, fragment: &str) -> bool {
        if self.fragment == fragment {
            return false;
        }
        self.fragment.clear();
        self.fragment.push_str(fragment);
        true
    }
}
