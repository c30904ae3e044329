//! Wikipedia reference lookup over the MediaWiki action API.
//!
//! One `load` is a ranked title search limited to `top_k`, followed by one
//! plain-text extract fetch per title. Each extract is cut to `max_chars`
//! characters.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use coordination::{CourtError, CourtResult, ReferenceDocument, ReferenceLookup};
use serde::Deserialize;
use tracing::debug;

use crate::config::WikiSettings;

const USER_AGENT: &str = concat!(
    "mock-court/",
    env!("CARGO_PKG_VERSION"),
    " (reference lookups for evidence summaries)"
);

/// Errors from the MediaWiki API.
#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<WikiError> for CourtError {
    fn from(e: WikiError) -> Self {
        CourtError::Lookup(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    missing: bool,
}

/// Ranked titles from a `list=search` response body.
pub fn parse_search_titles(body: &str) -> Result<Vec<String>, WikiError> {
    let resp: SearchResponse = serde_json::from_str(body)?;
    Ok(resp
        .query
        .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
        .unwrap_or_default())
}

/// First existing page from a `prop=extracts` (formatversion=2) body,
/// content truncated to `max_chars` characters.
pub fn parse_extract(body: &str, max_chars: usize) -> Result<Option<ReferenceDocument>, WikiError> {
    let resp: ExtractResponse = serde_json::from_str(body)?;
    let page = resp
        .query
        .and_then(|q| q.pages.into_iter().find(|p| !p.missing));
    Ok(page.map(|p| {
        let content = p.extract.unwrap_or_default();
        ReferenceDocument::new(p.title, truncate_chars(&content, max_chars))
    }))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// [`ReferenceLookup`] backed by one Wikipedia language edition.
pub struct WikipediaLookup {
    client: reqwest::Client,
    api_url: String,
    top_k: usize,
    max_chars: usize,
}

impl WikipediaLookup {
    pub fn new(settings: &WikiSettings) -> Result<Self> {
        let api_url = format!("https://{}.wikipedia.org/w/api.php", settings.lang);
        Self::with_api_url(settings, api_url)
    }

    /// Point at an arbitrary MediaWiki API endpoint.
    pub fn with_api_url(settings: &WikiSettings, api_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build Wikipedia HTTP client")?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            top_k: settings.top_k,
            max_chars: settings.max_chars,
        })
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<String, WikiError> {
        let response = self.client.get(&self.api_url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(WikiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        Ok(body)
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, WikiError> {
        let limit = self.top_k.to_string();
        let body = self
            .get(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", &limit),
                ("format", "json"),
                ("utf8", "1"),
            ])
            .await?;
        let mut titles = parse_search_titles(&body)?;
        titles.truncate(self.top_k);
        Ok(titles)
    }

    async fn extract(&self, title: &str) -> Result<Option<ReferenceDocument>, WikiError> {
        let body = self
            .get(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .await?;
        parse_extract(&body, self.max_chars)
    }
}

#[async_trait]
impl ReferenceLookup for WikipediaLookup {
    async fn load(&self, query: &str) -> CourtResult<Vec<ReferenceDocument>> {
        let titles = self.search(query).await?;
        debug!(query = %query, hits = titles.len(), "Wikipedia search");

        let mut docs = Vec::with_capacity(titles.len());
        for title in &titles {
            if let Some(doc) = self.extract(title).await? {
                docs.push(doc);
            }
        }
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn test_parse_search_titles_keeps_rank_order() {
        let body = r#"{"batchcomplete":"","query":{"searchinfo":{"totalhits":2},
            "search":[{"ns":0,"title":"Foo Bar","pageid":1},{"ns":0,"title":"Foo Baz","pageid":2}]}}"#;
        assert_eq!(
            parse_search_titles(body).unwrap(),
            vec!["Foo Bar".to_string(), "Foo Baz".to_string()]
        );
    }

    #[test]
    fn test_parse_search_without_query_is_empty() {
        assert!(parse_search_titles(r#"{"batchcomplete":""}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_search_rejects_garbage() {
        assert!(matches!(
            parse_search_titles("<html>"),
            Err(WikiError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_extract_truncates() {
        let body = r#"{"query":{"pages":[{"pageid":7,"title":"Ada Lovelace","extract":"Ada was a mathematician."}]}}"#;
        let doc = parse_extract(body, 3).unwrap().unwrap();
        assert_eq!(doc.title, "Ada Lovelace");
        assert_eq!(doc.content, "Ada");
    }

    #[test]
    fn test_parse_extract_skips_missing_pages() {
        let body = r#"{"query":{"pages":[{"title":"Nope","missing":true}]}}"#;
        assert!(parse_extract(body, 100).unwrap().is_none());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("ธรรมนัส", 3), "ธรร");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    fn settings(top_k: usize, max_chars: usize) -> WikiSettings {
        WikiSettings {
            lang: "en".into(),
            top_k,
            max_chars,
            timeout: Duration::from_secs(5),
        }
    }

    fn lookup_for(server: &MockServer, top_k: usize, max_chars: usize) -> WikipediaLookup {
        WikipediaLookup::with_api_url(
            &settings(top_k, max_chars),
            format!("{}/w/api.php", server.uri()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_searches_then_extracts_and_skips_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("list", "search"))
            .and(query_param("srsearch", "Ada"))
            .and(query_param("srlimit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": {"search": [
                    {"ns": 0, "title": "Ada Lovelace"},
                    {"ns": 0, "title": "Ada Gone"}
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("prop", "extracts"))
            .and(query_param("titles", "Ada Lovelace"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": {"pages": [
                    {"pageid": 1, "title": "Ada Lovelace",
                     "extract": "Ada Lovelace was an English mathematician."}
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("prop", "extracts"))
            .and(query_param("titles", "Ada Gone"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": {"pages": [{"title": "Ada Gone", "missing": true}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let docs = lookup_for(&server, 2, 12).load("Ada").await.unwrap();

        assert_eq!(docs, vec![ReferenceDocument::new("Ada Lovelace", "Ada Lovelace")]);
    }

    #[tokio::test]
    async fn test_load_with_no_hits_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("list", "search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"query": {"search": []}})),
            )
            .mount(&server)
            .await;

        let docs = lookup_for(&server, 3, 100).load("zzz").await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_load_maps_http_failure_to_lookup_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let err = lookup_for(&server, 3, 100).load("Ada").await.unwrap_err();
        assert_eq!(err, CourtError::Lookup("HTTP 503: busy".into()));
    }

    #[test]
    fn test_wiki_error_maps_to_lookup() {
        let err: CourtError = WikiError::Status {
            status: 503,
            body: "busy".into(),
        }
        .into();
        assert_eq!(err, CourtError::Lookup("HTTP 503: busy".into()));
    }
}
