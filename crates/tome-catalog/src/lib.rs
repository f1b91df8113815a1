//! Chapter catalog for the Tome documentation viewer.
//!
//! This crate turns a fixed, ordered list of markdown source identifiers
//! into a [`Catalog`] of [`Chapter`]s with derived display titles and
//! URL-fragment-safe navigation keys. It is pure data: no I/O happens here.
//!
//! # Quick Start
//!
//! ```
//! use tome_catalog::Catalog;
//!
//! let catalog = Catalog::from_sources(
//!     "chapters",
//!     ["00_index.md", "01_getting_started.md"],
//! )?;
//!
//! assert_eq!(catalog.first().display_title, "Home / Overview");
//! assert_eq!(catalog.get(1).unwrap().navigation_key, "01_getting_started");
//! # Ok::<(), tome_catalog::CatalogError>(())
//! ```

mod catalog;
mod chapter;

pub use catalog::{Catalog, CatalogError};
pub use chapter::{Chapter, navigation_key};
