//! Chapter content source boundary for the Tome documentation viewer.
//!
//! Chapters are plain-text resources retrieved by unauthenticated GET.
//! The [`Fetch`] trait abstracts the transport; [`HttpFetch`] is the HTTP
//! backend over a pooled ureq agent. Transport failures surface as
//! [`FetchError`]; HTTP status handling (success, not-modified retry) is
//! the caller's concern, so responses carry their status code.
//!
//! A builder-style in-memory [`MockFetch`] is available behind the `mock`
//! feature for tests.

mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use http::HttpFetch;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockFetch;

/// HTTP status for "not modified".
pub const STATUS_NOT_MODIFIED: u16 = 304;

/// Error reaching the content source.
///
/// Transport-level only; a response with a failure status code is not a
/// `FetchError` but a [`FetchResponse`] the caller inspects.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The transport could not complete the request.
    #[error("request for '{path}' failed: {message}")]
    Transport {
        /// Requested content path.
        path: String,
        /// Underlying transport error description.
        message: String,
    },
    /// The response body could not be read as text.
    #[error("response body for '{path}' unreadable: {message}")]
    Body {
        /// Requested content path.
        path: String,
        /// Underlying read error description.
        message: String,
    },
}

/// One fetched response: status code plus body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code (backends without real HTTP report 200/404-style codes).
    pub status: u16,
    /// Response body as text. Empty for error statuses without a body.
    pub body: String,
}

impl FetchResponse {
    /// Whether the status is a 2xx success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the source reported "not modified" (treated as transient;
    /// the loader retries once with a cache-busting query parameter).
    #[must_use]
    pub fn is_not_modified(&self) -> bool {
        self.status == STATUS_NOT_MODIFIED
    }
}

/// Content source abstraction.
///
/// Implementations must always bypass intermediary caches: prior cached
/// responses are treated as stale ("always refetch").
pub trait Fetch: Send + Sync {
    /// Retrieve the resource at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the transport fails outright. Responses
    /// with non-success statuses are returned, not converted to errors.
    fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for std::sync::Arc<T> {
    fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
        (**self).fetch(path)
    }
}
