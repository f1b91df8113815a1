//! HTTP backend over ureq.

use std::time::Duration;

use ureq::Agent;

use crate::{Fetch, FetchError, FetchResponse};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP content source.
///
/// Uses one pooled agent for connection reuse. Every request carries
/// `Cache-Control: no-cache` so intermediaries revalidate instead of
/// serving stale chapter text. Non-success statuses are reported in the
/// [`FetchResponse`], never raised as transport errors.
pub struct HttpFetch {
    agent: Agent,
    base_url: Option<String>,
}

impl HttpFetch {
    /// Create a fetcher with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with an explicit request timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: None,
        }
    }

    /// Resolve relative content paths against a base URL.
    ///
    /// Absolute `http(s)` paths are requested as-is either way.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        match &self.base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/')),
            None => path.to_owned(),
        }
    }
}

impl Default for HttpFetch {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetch {
    fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
        let url = self.resolve(path);
        tracing::debug!(url = %url, "Fetching chapter content");

        let response = self
            .agent
            .get(&url)
            .header("Cache-Control", "no-cache")
            .call()
            .map_err(|e| FetchError::Transport {
                path: path.to_owned(),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::Body {
                path: path.to_owned(),
                message: e.to_string(),
            })?;

        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_resolve_relative_against_base() {
        let fetch = HttpFetch::new().with_base_url("http://localhost:7979/docs/");
        assert_eq!(
            fetch.resolve("chapters/01_intro.md"),
            "http://localhost:7979/docs/chapters/01_intro.md"
        );
    }

    #[test]
    fn test_resolve_absolute_untouched() {
        let fetch = HttpFetch::new().with_base_url("http://localhost:7979");
        assert_eq!(
            fetch.resolve("https://example.com/x.md"),
            "https://example.com/x.md"
        );
    }

    #[test]
    fn test_resolve_without_base() {
        let fetch = HttpFetch::new();
        assert_eq!(fetch.resolve("chapters/a.md"), "chapters/a.md");
    }
}
