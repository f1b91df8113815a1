//! Tome CLI - chapter-based documentation viewer.
//!
//! Provides commands for:
//! - `view`: Load and display a chapter through the full pipeline
//! - `chapters`: List the chapter catalog

mod commands;
mod error;
mod highlight;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ChaptersArgs, ViewArgs};
use output::Output;

/// Tome - chapter-based documentation viewer.
#[derive(Parser)]
#[command(name = "tome", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a chapter and print the rendered result.
    View(ViewArgs),
    /// List the chapter catalog.
    Chapters(ChaptersArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::View(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::View(args) => args.execute(),
        Commands::Chapters(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
