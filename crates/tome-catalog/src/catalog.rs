//! Catalog construction and lookups.
//!
//! The catalog is built once at startup from a fixed ordered list of
//! source identifiers and never mutated afterwards. Chapters are stored
//! in a flat `Vec` with `HashMap` indexes for O(1) key and source-name
//! lookups; insertion order defines the sidebar order and the default
//! chapter (index 0).

use std::collections::HashMap;

use crate::chapter::{Chapter, HOME_TITLE, base_title, is_home, navigation_key, numeric_prefix};

/// Error building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No source identifiers were configured. Fatal to the session;
    /// callers display a "no content configured" state instead of crashing.
    #[error("no documentation chapters configured")]
    Empty,
    /// Two source identifiers derived the same navigation key. The key is
    /// the sole routing identity, so this is a configuration error.
    #[error("duplicate navigation key '{key}' derived from '{first}' and '{second}'")]
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },
}

/// The fixed, ordered set of all chapters for a session.
#[derive(Debug)]
pub struct Catalog {
    chapters: Vec<Chapter>,
    key_index: HashMap<String, usize>,
    source_index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from an ordered list of source identifiers.
    ///
    /// `content_root` is prepended to each identifier to form the path the
    /// loader fetches from. Index 0 becomes the default chapter.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Empty`] for an empty list and
    /// [`CatalogError::DuplicateKey`] when two identifiers collapse to the
    /// same navigation key.
    pub fn from_sources<I, S>(content_root: &str, sources: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut chapters = Vec::new();
        let mut key_index = HashMap::new();
        let mut source_index = HashMap::new();

        for (position, source) in sources.into_iter().enumerate() {
            let source_id: String = source.into();
            let key = navigation_key(&source_id);

            if let Some(&prev) = key_index.get(&key) {
                let first: &Chapter = &chapters[prev];
                return Err(CatalogError::DuplicateKey {
                    key,
                    first: first.source_id.clone(),
                    second: source_id,
                });
            }

            let chapter = Chapter {
                content_path: join_content_path(content_root, &source_id),
                display_title: display_title(&source_id, position),
                navigation_key: key.clone(),
                source_id: source_id.clone(),
            };

            key_index.insert(key, position);
            source_index.insert(source_id, position);
            chapters.push(chapter);
        }

        if chapters.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self {
            chapters,
            key_index,
            source_index,
        })
    }

    /// Number of chapters. Never zero for a successfully built catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Always false for a successfully built catalog; present for
    /// completeness of the collection API.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// The default/home chapter (catalog position 0).
    #[must_use]
    pub fn first(&self) -> &Chapter {
        &self.chapters[0]
    }

    /// Chapter at a catalog position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Chapter> {
        self.chapters.get(position)
    }

    /// Iterate chapters in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Chapter> {
        self.chapters.iter()
    }

    /// Look up a chapter by its navigation key.
    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<&Chapter> {
        self.key_index.get(key).map(|&i| &self.chapters[i])
    }

    /// Catalog position of a navigation key.
    #[must_use]
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.key_index.get(key).copied()
    }

    /// Look up a chapter by its source identifier (a bare filename).
    ///
    /// Used by the link rewriter to match `.md` link targets against the
    /// catalog after the path portion has been dropped.
    #[must_use]
    pub fn by_source_name(&self, name: &str) -> Option<&Chapter> {
        self.source_index.get(name).map(|&i| &self.chapters[i])
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Chapter;
    type IntoIter = std::slice::Iter<'a, Chapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Join the content root and a source identifier into a fetchable path.
fn join_content_path(content_root: &str, source_id: &str) -> String {
    let root = content_root.trim_end_matches('/');
    if root.is_empty() {
        source_id.to_owned()
    } else {
        format!("{root}/{source_id}")
    }
}

/// Derive the display title for a source identifier at a catalog position.
///
/// The home chapter keeps its fixed, unnumbered label only when it sits at
/// position 0; anywhere else it is numbered like any other chapter. Other
/// chapters are numbered by their leading numeric prefix when present,
/// otherwise by catalog position.
fn display_title(source_id: &str, position: usize) -> String {
    if is_home(source_id) && position == 0 {
        return HOME_TITLE.to_owned();
    }

    let title = base_title(source_id);
    match numeric_prefix(source_id) {
        Some(number) => format!("{number}. {title}"),
        None => format!("{position}. {title}"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn catalog(sources: &[&str]) -> Catalog {
        Catalog::from_sources("chapters", sources.iter().copied()).unwrap()
    }

    #[test]
    fn test_home_and_numbered_titles() {
        let catalog = catalog(&["00_index.md", "01_openapi_specification_.md"]);

        let home = catalog.first();
        assert_eq!(home.display_title, "Home / Overview");
        assert_eq!(home.navigation_key, "00_index");
        assert_eq!(home.content_path, "chapters/00_index.md");

        let first = catalog.get(1).unwrap();
        assert_eq!(first.display_title, "1. Openapi Specification");
        assert_eq!(first.navigation_key, "01_openapi_specification_");
    }

    #[test]
    fn test_numeric_prefix_parsed_without_zero_padding() {
        let catalog = catalog(&["00_index.md", "07_api_service_.md"]);

        assert_eq!(catalog.get(1).unwrap().display_title, "7. Api Service");
    }

    #[test]
    fn test_position_numbering_without_prefix() {
        let catalog = catalog(&["intro.md", "usage.md"]);

        assert_eq!(catalog.get(0).unwrap().display_title, "0. Intro");
        assert_eq!(catalog.get(1).unwrap().display_title, "1. Usage");
    }

    #[test]
    fn test_home_not_first_is_numbered() {
        let catalog = catalog(&["01_intro.md", "00_index.md"]);

        assert_eq!(catalog.get(0).unwrap().display_title, "1. Intro");
        assert_eq!(catalog.get(1).unwrap().display_title, "0. Index");
    }

    #[test]
    fn test_empty_catalog_error() {
        let result = Catalog::from_sources("chapters", Vec::<String>::new());

        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn test_duplicate_navigation_key_rejected() {
        // Both collapse to "apiv1" once unsafe characters are removed.
        let result = Catalog::from_sources("chapters", ["api v1.md", "api(v1).md"]);

        match result {
            Err(CatalogError::DuplicateKey { key, first, second }) => {
                assert_eq!(key, "apiv1");
                assert_eq!(first, "api v1.md");
                assert_eq!(second, "api(v1).md");
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }

    #[test]
    fn test_navigation_keys_injective() {
        let catalog = catalog(&[
            "00_index.md",
            "01_openapi_specification_.md",
            "02_dynamic_form_generation_.md",
            "03_authentication_management_.md",
        ]);

        let mut keys: Vec<&str> =
            catalog.iter().map(|c| c.navigation_key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), catalog.len());
    }

    #[test]
    fn test_lookup_by_key_and_source_name() {
        let catalog = catalog(&["00_index.md", "05_api_service_.md"]);

        let by_key = catalog.by_key("05_api_service_").unwrap();
        assert_eq!(by_key.source_id, "05_api_service_.md");

        let by_name = catalog.by_source_name("05_api_service_.md").unwrap();
        assert_eq!(by_name.navigation_key, "05_api_service_");

        assert!(catalog.by_key("nonexistent").is_none());
        assert!(catalog.by_source_name("other.md").is_none());
    }

    #[test]
    fn test_empty_content_root_uses_bare_source_id() {
        let catalog = Catalog::from_sources("", ["guide.md"]).unwrap();

        assert_eq!(catalog.first().content_path, "guide.md");
    }

    #[test]
    fn test_content_root_trailing_slash_trimmed() {
        let catalog = Catalog::from_sources("docs/", ["guide.md"]).unwrap();

        assert_eq!(catalog.first().content_path, "docs/guide.md");
    }
}
