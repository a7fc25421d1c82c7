//! Semantic Scholar citation graph client.

use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::models::Paper;
use crate::sources::SourceError;

const SEMANTIC_API_BASE: &str = "https://api.semanticscholar.org/graph/v1";

/// Fields requested per lookup: external ids, title and authors for both
/// the citing and the cited papers.
const GRAPH_FIELDS: &str = "citations.externalIds,citations.title,citations.authors,\
references.externalIds,references.title,references.authors";

/// Semantic Scholar graph API client
#[derive(Debug, Clone)]
pub struct SemanticScholarClient {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
}

impl SemanticScholarClient {
    /// Create a new client against the public API
    pub fn new() -> Self {
        Self::with_base_url(SEMANTIC_API_BASE)
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(
                Client::builder()
                    .user_agent(concat!(
                        env!("CARGO_PKG_NAME"),
                        "/",
                        env!("CARGO_PKG_VERSION")
                    ))
                    .timeout(Duration::from_secs(30))
                    .build()
                    .expect("Failed to create HTTP client"),
            ),
            base_url: base_url.into(),
            api_key: std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok(),
        }
    }

    /// Create with an API key (optional, for higher rate limits)
    pub fn with_api_key(api_key: String) -> Self {
        let mut client = Self::new();
        client.api_key = Some(api_key);
        client
    }

    /// Add API key to request headers if available
    fn add_api_key_if_present(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref key) = self.api_key {
            builder.header("x-api-key", key)
        } else {
            builder
        }
    }

    /// Look up the papers citing `doi` and the papers it cites.
    ///
    /// A non-success response is a soft failure: the status is logged and
    /// both lists come back empty, so a batch run carries on with the next
    /// item. Network and JSON-decoding failures still surface as `Err`.
    pub async fn cites_and_refs(
        &self,
        doi: &str,
    ) -> Result<(Vec<Paper>, Vec<Paper>), SourceError> {
        let url = format!("{}/paper/{}", self.base_url, doi);

        let response = self
            .add_api_key_if_present(self.client.get(&url).query(&[("fields", GRAPH_FIELDS)]))
            .send()
            .await
            .map_err(|e| {
                SourceError::Network(format!("Failed to query Semantic Scholar: {}", e))
            })?;

        if !response.status().is_success() {
            warn!(doi, status = %response.status(), "graph lookup failed, treating as no results");
            return Ok((Vec::new(), Vec::new()));
        }

        let data: GraphResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        let citations = data.citations.iter().map(Self::parse_paper).collect();
        let references = data.references.iter().map(Self::parse_paper).collect();

        Ok((citations, references))
    }

    /// Parse a Semantic Scholar paper record
    fn parse_paper(data: &S2Paper) -> Paper {
        let authors = data
            .authors
            .iter()
            .filter_map(|author| author.name.clone())
            .collect();

        // externalIds may be null, and when present may still lack a DOI
        let doi = data
            .external_ids
            .as_ref()
            .and_then(|ids| ids.get("DOI"))
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();

        Paper::new(doi, data.title.clone().unwrap_or_default(), authors)
    }
}

impl Default for SemanticScholarClient {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Semantic Scholar API Types =====

#[derive(Debug, Deserialize)]
struct GraphResponse {
    #[serde(default)]
    citations: Vec<S2Paper>,

    #[serde(default)]
    references: Vec<S2Paper>,
}

#[derive(Debug, Deserialize)]
struct S2Paper {
    #[serde(rename = "externalIds", default)]
    external_ids: Option<HashMap<String, serde_json::Value>>,

    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    authors: Vec<S2Author>,
}

#[derive(Debug, Deserialize)]
struct S2Author {
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_paper_with_doi() {
        let data: S2Paper = serde_json::from_value(json!({
            "externalIds": {"DOI": "10.1234/x", "CorpusId": 42},
            "title": "A Paper",
            "authors": [{"name": "Ann Author"}, {"name": "Bob Builder"}]
        }))
        .unwrap();

        let paper = SemanticScholarClient::parse_paper(&data);
        assert_eq!(paper.doi, "10.1234/x");
        assert_eq!(paper.title, "A Paper");
        assert_eq!(paper.authors, vec!["Ann Author", "Bob Builder"]);
    }

    #[test]
    fn test_parse_paper_null_external_ids() {
        let data: S2Paper = serde_json::from_value(json!({
            "externalIds": null,
            "title": "No Ids",
            "authors": []
        }))
        .unwrap();

        let paper = SemanticScholarClient::parse_paper(&data);
        assert!(!paper.has_doi());
        assert_eq!(paper.title, "No Ids");
    }

    #[test]
    fn test_parse_paper_external_ids_without_doi() {
        let data: S2Paper = serde_json::from_value(json!({
            "externalIds": {"ArXiv": "2301.12345"},
            "title": "Preprint Only",
            "authors": [{"name": null}]
        }))
        .unwrap();

        let paper = SemanticScholarClient::parse_paper(&data);
        assert!(!paper.has_doi());
        assert!(paper.authors.is_empty());
    }

    #[tokio::test]
    async fn test_cites_and_refs_success() {
        let mut server = mockito::Server::new_async().await;

        let body = json!({
            "paperId": "abc123",
            "citations": [
                {
                    "externalIds": {"DOI": "10.1/citing"},
                    "title": "Citing Paper",
                    "authors": [{"name": "Cit Author"}]
                }
            ],
            "references": [
                {
                    "externalIds": null,
                    "title": "Referenced Paper",
                    "authors": []
                }
            ]
        });

        let mock = server
            .mock("GET", "/paper/10.1234/x")
            .match_query(mockito::Matcher::UrlEncoded(
                "fields".into(),
                GRAPH_FIELDS.into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = SemanticScholarClient::with_base_url(server.url());
        let (citations, references) = client.cites_and_refs("10.1234/x").await.unwrap();

        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].doi, "10.1/citing");
        assert_eq!(citations[0].title, "Citing Paper");
        assert_eq!(references.len(), 1);
        assert!(!references[0].has_doi());
        assert_eq!(references[0].title, "Referenced Paper");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_cites_and_refs_not_found_is_soft_failure() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/paper/10.1234/missing")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error": "Paper not found"}"#)
            .create_async()
            .await;

        let client = SemanticScholarClient::with_base_url(server.url());
        let (citations, references) = client.cites_and_refs("10.1234/missing").await.unwrap();

        assert!(citations.is_empty());
        assert!(references.is_empty());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_cites_and_refs_malformed_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/paper/10.1234/x")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = SemanticScholarClient::with_base_url(server.url());
        let result = client.cites_and_refs("10.1234/x").await;

        assert!(matches!(result, Err(SourceError::Parse(_))));
    }
}
