//! Tavily-backed search provider.
//!
//! Tavily covers all three provider operations: `/search`, `/extract` and
//! `/crawl`.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::security::ApiKey;
use crate::traits::provider::SearchProvider;
use crate::types::config::{ExtractDepth, SearchDepth};
use crate::types::search::{CrawledPage, ExtractedPage, SearchHit};

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    search_depth: &'static str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TavilySearchResult>,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResult {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    score: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    urls: Vec<&'a str>,
    extract_depth: &'static str,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    results: Vec<ExtractedPage>,
    #[serde(default)]
    failed_results: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct CrawlRequest<'a> {
    url: &'a str,
    instructions: &'a str,
}

#[derive(Debug, Deserialize)]
struct CrawlResponse {
    #[serde(default)]
    results: Vec<CrawledPage>,
}

/// Tavily API client.
pub struct TavilyClient {
    client: reqwest::Client,
    api_key: ApiKey,
    base_url: String,
    search_depth: SearchDepth,
    max_results: usize,
}

impl TavilyClient {
    /// Create a new Tavily client.
    pub fn new(api_key: impl Into<ApiKey>) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ProviderError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            search_depth: SearchDepth::Basic,
            max_results: 5,
        })
    }

    /// Create from environment variable `TAVILY_API_KEY`.
    pub fn from_env() -> ProviderResult<Self> {
        let key = ApiKey::from_env("TAVILY_API_KEY")
            .ok_or_else(|| ProviderError::Config("TAVILY_API_KEY not set".into()))?;
        Self::new(key)
    }

    /// Set a custom base URL (proxies, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set search depth.
    pub fn with_search_depth(mut self, depth: SearchDepth) -> Self {
        self.search_depth = depth;
        self
    }

    /// Set the maximum hits per search.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> ProviderResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, endpoint))
            .header("Authorization", self.api_key.bearer())
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ProviderError::Decode(format!("{} response: {}", endpoint, e)))
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str) -> ProviderResult<Vec<SearchHit>> {
        let request = SearchRequest {
            query,
            search_depth: self.search_depth.as_str(),
            max_results: self.max_results,
        };

        let response: SearchResponse = self.post("search", &request).await?;
        debug!(query, hits = response.results.len(), "Tavily search complete");

        Ok(response
            .results
            .into_iter()
            .map(|r| SearchHit {
                url: r.url,
                title: r.title,
                snippet: r.content,
                score: r.score,
            })
            .collect())
    }

    async fn extract(&self, url: &str, depth: ExtractDepth) -> ProviderResult<Vec<ExtractedPage>> {
        let request = ExtractRequest {
            urls: vec![url],
            extract_depth: depth.as_str(),
        };

        let response: ExtractResponse = self.post("extract", &request).await?;
        if !response.failed_results.is_empty() {
            debug!(url, failed = ?response.failed_results, "Tavily extract reported failures");
        }
        Ok(response.results)
    }

    async fn crawl(&self, url: &str, instructions: &str) -> ProviderResult<Vec<CrawledPage>> {
        let request = CrawlRequest { url, instructions };

        let response: CrawlResponse = self.post("crawl", &request).await?;
        debug!(url, pages = response.results.len(), "Tavily crawl complete");
        Ok(response.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_response_tolerates_missing_fields() {
        let response: ExtractResponse = serde_json::from_value(serde_json::json!({
            "results": [{ "url": "https://acmesteel.com" }]
        }))
        .unwrap();

        assert_eq!(response.results.len(), 1);
        assert!(response.results[0].usable_content().is_none());
        assert!(response.failed_results.is_empty());
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let client = TavilyClient::new("tvly-test")
            .unwrap()
            .with_base_url("http://localhost:9999/");
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    // Note: requires a real Tavily API key
    #[tokio::test]
    #[ignore]
    async fn test_tavily_search() {
        let client = TavilyClient::from_env().expect("TAVILY_API_KEY required");
        let hits = client.search("ISO 9001 fastener manufacturer").await.unwrap();
        assert!(!hits.is_empty());
    }
}
