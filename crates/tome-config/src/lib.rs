//! Configuration management for Tome.
//!
//! Parses `tome.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. CLI settings
//! can be applied during load via [`CliSettings`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tome.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the chapter content root.
    pub content_root: Option<String>,
    /// Override the fetch base URL.
    pub base_url: Option<String>,
    /// Override the Kroki URL for diagram rendering.
    pub kroki_url: Option<String>,
    /// Override the fetch timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Viewer configuration: the chapter list and where to fetch it from.
    pub viewer: ViewerConfig,
    /// Content fetch configuration.
    pub fetch: FetchConfig,
    /// Diagram rendering configuration.
    pub diagrams: DiagramsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Viewer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Root the chapter sources are fetched beneath.
    pub content_root: String,
    /// Ordered chapter source identifiers (markdown filenames).
    /// Order defines the sidebar and the default chapter.
    pub chapters: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            content_root: "chapters".to_owned(),
            chapters: Vec::new(),
        }
    }
}

/// Content fetch configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base URL relative content paths resolve against.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
        }
    }
}

/// Diagram rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Kroki server URL. When absent, diagram fences stay code blocks.
    pub kroki_url: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist. Otherwise `tome.toml`
    /// is auto-discovered from the current directory upward; when none is
    /// found, defaults apply. CLI settings override loaded values last.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing (explicit path),
    /// unreadable, unparsable, or fails validation.
    pub fn load(path: Option<&Path>, cli: Option<&CliSettings>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::NotFound(explicit.to_path_buf()));
                }
                Self::from_file(explicit)?
            }
            None => match discover(&std::env::current_dir()?) {
                Some(found) => Self::from_file(&found)?,
                None => Self::default(),
            },
        };

        if let Some(cli) = cli {
            config.apply_cli(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a specific configuration file.
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&text)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn apply_cli(&mut self, cli: &CliSettings) {
        if let Some(content_root) = &cli.content_root {
            self.viewer.content_root.clone_from(content_root);
        }
        if let Some(base_url) = &cli.base_url {
            self.fetch.base_url = Some(base_url.clone());
        }
        if let Some(kroki_url) = &cli.kroki_url {
            self.diagrams.kroki_url = Some(kroki_url.clone());
        }
        if let Some(timeout) = cli.timeout_secs {
            self.fetch.timeout_secs = timeout;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be greater than zero".to_owned(),
            ));
        }
        for chapter in &self.viewer.chapters {
            if !chapter.ends_with(".md") {
                return Err(ConfigError::Validation(format!(
                    "viewer.chapters entry '{chapter}' must end with .md"
                )));
            }
        }
        if let Some(url) = &self.fetch.base_url {
            require_http_url(url, "fetch.base_url")?;
        }
        if let Some(url) = &self.diagrams.kroki_url {
            require_http_url(url, "diagrams.kroki_url")?;
        }
        Ok(())
    }
}

/// Walk from `start` upward looking for the configuration file.
fn discover(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

/// Require a URL field to be http(s).
fn require_http_url(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(text: &str) -> Config {
        let mut config: Config = toml::from_str(text).unwrap();
        config.validate().unwrap();
        config
    }

    #[test]
    fn test_defaults() {
        let config = parse("");

        assert_eq!(config.viewer.content_root, "chapters");
        assert!(config.viewer.chapters.is_empty());
        assert_eq!(config.fetch.timeout_secs, 30);
        assert!(config.fetch.base_url.is_none());
        assert!(config.diagrams.kroki_url.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            r#"
            [viewer]
            content_root = "docs"
            chapters = ["00_index.md", "01_intro.md"]

            [fetch]
            base_url = "http://localhost:8000"
            timeout_secs = 5

            [diagrams]
            kroki_url = "https://kroki.io"
            "#,
        );

        assert_eq!(config.viewer.content_root, "docs");
        assert_eq!(config.viewer.chapters.len(), 2);
        assert_eq!(config.fetch.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.diagrams.kroki_url.as_deref(), Some("https://kroki.io"));
    }

    #[test]
    fn test_non_markdown_chapter_rejected() {
        let config: Config = toml::from_str(
            r#"
            [viewer]
            chapters = ["notes.txt"]
            "#,
        )
        .unwrap();

        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config: Config = toml::from_str("[fetch]\ntimeout_secs = 0").unwrap();

        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_non_http_kroki_url_rejected() {
        let config: Config = toml::from_str("[diagrams]\nkroki_url = \"ftp://x\"").unwrap();

        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = parse("[viewer]\ncontent_root = \"docs\"");
        config.apply_cli(&CliSettings {
            content_root: Some("other".to_owned()),
            base_url: Some("http://localhost:9999".to_owned()),
            kroki_url: None,
            timeout_secs: Some(10),
        });

        assert_eq!(config.viewer.content_root, "other");
        assert_eq!(config.fetch.base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(config.fetch.timeout_secs, 10);
    }

    #[test]
    fn test_explicit_missing_path_errors() {
        let result = Config::load(Some(Path::new("/nonexistent/tome.toml")), None);

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_discovery_walks_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "[viewer]\ncontent_root = \"found\"",
        )
        .unwrap();

        let found = discover(&nested).unwrap();
        let config = Config::from_file(&found).unwrap();

        assert_eq!(config.viewer.content_root, "found");
        assert_eq!(config.config_path.as_deref(), Some(found.as_path()));
    }

    #[test]
    fn test_discovery_without_file() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(discover(dir.path()), None);
    }
}
