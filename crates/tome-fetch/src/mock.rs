//! Mock content source for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::{Fetch, FetchError, FetchResponse};

/// In-memory content source for unit tests.
///
/// Configure canned responses with the builder methods; every call is
/// recorded so tests can assert fetch counts and exact requested paths
/// (including cache-busting query parameters).
///
/// # Example
///
/// ```ignore
/// use tome_fetch::{Fetch, MockFetch};
///
/// let fetch = MockFetch::new()
///     .with_page("chapters/guide.md", "# Guide")
///     .with_status("chapters/broken.md", 500);
///
/// assert_eq!(fetch.fetch("chapters/guide.md").unwrap().body, "# Guide");
/// assert_eq!(fetch.fetch("chapters/broken.md").unwrap().status, 500);
/// assert_eq!(fetch.calls().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockFetch {
    responses: HashMap<String, FetchResponse>,
    failures: HashMap<String, String>,
    calls: RwLock<Vec<String>>,
}

impl MockFetch {
    /// Create an empty mock; unknown paths respond with status 404.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `path` with status 200 and the given body.
    #[must_use]
    pub fn with_page(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(
            path.into(),
            FetchResponse {
                status: 200,
                body: body.into(),
            },
        );
        self
    }

    /// Respond to `path` with the given status and an empty body.
    #[must_use]
    pub fn with_status(mut self, path: impl Into<String>, status: u16) -> Self {
        self.responses.insert(
            path.into(),
            FetchResponse {
                status,
                body: String::new(),
            },
        );
        self
    }

    /// Fail requests for `path` with a transport error.
    #[must_use]
    pub fn with_transport_failure(
        mut self,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.failures.insert(path.into(), message.into());
        self
    }

    /// Every requested path, in request order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of requests made for paths beginning with `prefix`.
    ///
    /// Lets tests count retries regardless of the cache-busting suffix.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls_for(&self, prefix: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.starts_with(prefix))
            .count()
    }
}

impl Fetch for MockFetch {
    fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
        self.calls.write().unwrap().push(path.to_owned());

        if let Some(message) = self.failures.get(path) {
            return Err(FetchError::Transport {
                path: path.to_owned(),
                message: message.clone(),
            });
        }

        // Cache-busting requests fall back to the bare path.
        let bare = path.split_once('?').map_or(path, |(p, _)| p);
        Ok(self
            .responses
            .get(path)
            .or_else(|| self.responses.get(bare))
            .cloned()
            .unwrap_or(FetchResponse {
                status: 404,
                body: String::new(),
            }))
    }
}
