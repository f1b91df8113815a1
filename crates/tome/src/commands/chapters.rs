//! `tome chapters` command implementation.

use std::path::PathBuf;

use clap::Args;
use tome_catalog::{Catalog, CatalogError};
use tome_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the chapters command.
#[derive(Args)]
pub(crate) struct ChaptersArgs {
    /// Path to configuration file (default: auto-discover tome.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit the catalog as JSON.
    #[arg(long)]
    json: bool,
}

impl ChaptersArgs {
    /// Execute the chapters command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or catalog construction
    /// fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        let catalog = match Catalog::from_sources(
            &config.viewer.content_root,
            config.viewer.chapters.clone(),
        ) {
            Ok(catalog) => catalog,
            Err(CatalogError::Empty) => {
                output.warning("No documentation chapters configured.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if self.json {
            let chapters: Vec<_> = catalog.iter().collect();
            output.payload(&serde_json::to_string_pretty(&chapters)?);
        } else {
            for chapter in &catalog {
                output.payload(&format!(
                    "{}  #{}  ({})",
                    chapter.display_title, chapter.navigation_key, chapter.content_path
                ));
            }
            output.success(&format!("{} chapters", catalog.len()));
        }

        Ok(())
    }
}
