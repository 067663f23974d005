//! Tavily Search Client
//!
//! Thin client for the Tavily web-search API. Returns the result
//! contents joined into one newline-separated string, which the agent
//! feeds back to the model as an observation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{SearchClient, SearchHit};

/// How many results to request per search.
const MAX_RESULTS: u32 = 2;

/// Search client for the Tavily API.
pub struct TavilyClient {
    api_url: String,
    api_key: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

impl TavilyClient {
    /// Create a new `TavilyClient` pointed at `api_url`.
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            api_url,
            api_key,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, query: &str) -> Result<String> {
        let url = format!("{}/search", self.api_url);

        let response = self
            .http
            .post(&url)
            .json(&SearchRequest {
                api_key: &self.api_key,
                query,
                max_results: MAX_RESULTS,
            })
            .send()
            .await
            .context("Search request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Search API returned {}: {}", status, body);
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse search response")?;

        debug!(query, hits = body.results.len(), "search returned");

        Ok(format_results(&body.results))
    }
}

/// Join the `content` field of each hit with newline separators.
fn format_results(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| hit.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(content: &str) -> SearchHit {
        SearchHit {
            title: None,
            url: None,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_format_results_joins_with_newlines() {
        let joined = format_results(&[hit("A"), hit("B")]);
        assert_eq!(joined, "A\nB");
    }

    #[test]
    fn test_format_results_empty() {
        assert_eq!(format_results(&[]), "");
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "results": [
                {"title": "One", "url": "https://a.example", "content": "first"},
                {"content": "second"}
            ],
            "response_time": 0.8
        }"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(format_results(&parsed.results), "first\nsecond");
    }
}
