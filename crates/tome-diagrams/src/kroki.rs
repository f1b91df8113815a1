//! Kroki-backed diagram drawing.

use std::time::Duration;

use ureq::Agent;

use crate::{DiagramError, DiagramLanguage, RenderDiagram};

/// Default HTTP timeout for Kroki requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Diagram renderer posting sources to a Kroki server and inlining the
/// returned SVG.
pub struct KrokiDiagrams {
    agent: Agent,
    server_url: String,
}

impl KrokiDiagrams {
    /// Create a renderer for the given Kroki server URL
    /// (e.g., `"https://kroki.io"`).
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_timeout(server_url, DEFAULT_TIMEOUT)
    }

    /// Create a renderer with an explicit request timeout.
    #[must_use]
    pub fn with_timeout(server_url: impl Into<String>, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            server_url: server_url.into(),
        }
    }
}

impl RenderDiagram for KrokiDiagrams {
    fn render(&self, language: DiagramLanguage, source: &str) -> Result<String, DiagramError> {
        let url = format!("{}/{}/svg", self.server_url.trim_end_matches('/'), language.tag());
        tracing::debug!(url = %url, "Rendering diagram via Kroki");

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(source.as_bytes())
            .map_err(|e| DiagramError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(DiagramError::Http(format!("HTTP {status}: {error_body}")));
        }

        body.read_to_string()
            .map_err(|e| DiagramError::Io(e.to_string()))
    }
}
