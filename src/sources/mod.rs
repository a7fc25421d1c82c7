//! External bibliographic data sources.
//!
//! Currently a single source: the Semantic Scholar citation graph. The
//! client exposes one lookup, [`SemanticScholarClient::cites_and_refs`],
//! which resolves a DOI into the papers citing it and the papers it cites.

mod semantic;

pub use semantic::SemanticScholarClient;

/// Errors that can occur when talking to a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}
