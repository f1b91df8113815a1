//! `tome view` command implementation.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tome_catalog::{Catalog, CatalogError};
use tome_config::{CliSettings, Config};
use tome_diagrams::KrokiDiagrams;
use tome_fetch::HttpFetch;
use tome_renderer::CmarkRender;
use tome_viewer::{
    ChapterLoader, Collaborators, MemorySurface, NavEvent, Router, RouterState, sidebar,
};

use crate::error::CliError;
use crate::highlight::SyntectHighlight;
use crate::output::Output;

/// Arguments for the view command.
#[derive(Args)]
pub(crate) struct ViewArgs {
    /// Path to configuration file (default: auto-discover tome.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fragment to open, without the leading '#'
    /// (default: the first chapter).
    #[arg(short, long)]
    fragment: Option<String>,

    /// Chapter content root (overrides config).
    #[arg(long)]
    content_root: Option<String>,

    /// Base URL for content fetching (overrides config).
    #[arg(long)]
    base_url: Option<String>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long)]
    kroki_url: Option<String>,

    /// Fetch timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Disable syntax highlighting.
    #[arg(long)]
    no_highlight: bool,

    /// Enable verbose output (collaborator wiring and degraded paths).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ViewArgs {
    /// Execute the view command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or catalog construction
    /// fails. Chapter-level failures are displayed in the rendered output
    /// instead, as the viewer recovers from them.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Keep the non-config flags before moving the rest into CliSettings.
        let fragment = self.fragment;
        let no_highlight = self.no_highlight;

        let cli_settings = CliSettings {
            content_root: self.content_root,
            base_url: self.base_url,
            kroki_url: self.kroki_url,
            timeout_secs: self.timeout,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let catalog = match Catalog::from_sources(
            &config.viewer.content_root,
            config.viewer.chapters.clone(),
        ) {
            Ok(catalog) => catalog,
            Err(CatalogError::Empty) => {
                output.warning("No documentation chapters configured.");
                output.payload(tome_viewer::no_content_markup());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let collab = build_collaborators(&config, no_highlight);
        collab.log_availability();

        let mut surface = MemorySurface::new().with_fragment(fragment.unwrap_or_default());
        let entries = sidebar::build_or_report(&catalog, &mut surface);
        let mut router =
            Router::new(catalog, ChapterLoader::new(collab)).with_sidebar_entries(entries);

        router.handle(NavEvent::Startup, &mut surface);

        print_sidebar(&output, &surface);
        match router.state() {
            RouterState::Error { cause, .. } => {
                output.warning(&format!("Chapter failed to load: {cause}"));
            }
            RouterState::Displaying { .. } | RouterState::Uninitialized => {}
        }
        output.payload(surface.content());

        Ok(())
    }
}

/// Wire the real collaborators from configuration.
fn build_collaborators(config: &Config, no_highlight: bool) -> Collaborators {
    let mut fetch = HttpFetch::with_timeout(Duration::from_secs(config.fetch.timeout_secs));
    if let Some(base_url) = &config.fetch.base_url {
        fetch = fetch.with_base_url(base_url);
    }

    let mut collab =
        Collaborators::new(Box::new(fetch)).with_render(Box::new(CmarkRender::new()));

    if let Some(kroki_url) = &config.diagrams.kroki_url {
        collab = collab.with_diagrams(Box::new(KrokiDiagrams::new(kroki_url)));
    }
    if !no_highlight {
        collab = collab.with_highlight(Box::new(SyntectHighlight::new()));
    }

    collab
}

/// Print the sidebar listing, marking the active entry.
fn print_sidebar(output: &Output, surface: &MemorySurface) {
    for entry in surface.entries() {
        if entry.active {
            output.highlight(&format!("> {} ({})", entry.title, entry.fragment));
        } else {
            output.info(&format!("  {} ({})", entry.title, entry.fragment));
        }
    }
}
