//! Paper record returned by the citation graph service.

use serde::{Deserialize, Serialize};

/// A paper as reported by the citation graph lookup
///
/// Ephemeral: built per API response, matched against the library, then
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// Digital Object Identifier; empty when the service has none on record
    pub doi: String,

    /// Paper title
    pub title: String,

    /// Author names in publication order
    pub authors: Vec<String>,
}

impl Paper {
    /// Create a new paper record
    pub fn new(
        doi: impl Into<String>,
        title: impl Into<String>,
        authors: Vec<String>,
    ) -> Self {
        Self {
            doi: doi.into(),
            title: title.into(),
            authors,
        }
    }

    /// Whether the service reported a DOI for this paper
    pub fn has_doi(&self) -> bool {
        !self.doi.is_empty()
    }
}
