//! # citelink
//!
//! Enrich a Zotero library by cross-linking items that cite or are cited
//! by each other, discovered through the Semantic Scholar citation graph.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`]: connection credentials for the Zotero Web API
//! - [`models`]: core data structures (Paper, Item)
//! - [`sources`]: citation graph client
//! - [`zotero`]: Zotero Web API client
//! - [`relations`]: relation matching and the batch enrichment pass

pub mod config;
pub mod models;
pub mod relations;
pub mod sources;
pub mod zotero;

// Re-export commonly used types
pub use models::{Item, Paper};
pub use sources::SemanticScholarClient;
pub use zotero::ZoteroClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
