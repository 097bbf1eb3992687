//! Testing utilities including mock implementations.
//!
//! These are useful for testing code that drives the supplier graph without
//! making real search or LLM calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{ModelError, ModelResult, ProviderError, ProviderResult};
use crate::traits::{
    model::{ExtractionModel, TargetShape},
    provider::SearchProvider,
};
use crate::types::{
    config::ExtractDepth,
    message::Message,
    search::{CrawledPage, ExtractedPage, SearchHit},
    supplier::Supplier,
};

/// A mock search provider for testing.
///
/// Unknown queries and URLs answer with an empty list, never an error.
#[derive(Default)]
pub struct MockSearchProvider {
    /// Hits by query
    hits: Arc<RwLock<HashMap<String, Vec<SearchHit>>>>,

    /// Raw page content by URL
    pages: Arc<RwLock<HashMap<String, String>>>,

    /// Crawled page URLs by start URL
    crawls: Arc<RwLock<HashMap<String, Vec<String>>>>,

    /// Queries and URLs that fail
    failing_searches: Arc<RwLock<HashSet<String>>>,
    failing_extracts: Arc<RwLock<HashSet<String>>>,
    failing_crawls: Arc<RwLock<HashSet<String>>>,

    /// Artificial latency for every search
    search_delay: Option<Duration>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockProviderCall>>>,
}

/// Record of a call made to the mock provider.
#[derive(Debug, Clone, PartialEq)]
pub enum MockProviderCall {
    Search { query: String },
    Extract { url: String },
    Crawl { url: String, instructions: String },
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with one hit per URL, in order.
    pub fn with_hits(self, query: impl Into<String>, urls: &[&str]) -> Self {
        let hits = urls.iter().map(|url| SearchHit::new(*url)).collect();
        self.hits.write().unwrap().insert(query.into(), hits);
        self
    }

    /// Make searches for `query` fail.
    pub fn failing_search(self, query: impl Into<String>) -> Self {
        self.failing_searches.write().unwrap().insert(query.into());
        self
    }

    /// Serve `content` when `url` is extracted.
    pub fn with_page(self, url: impl Into<String>, content: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), content.into());
        self
    }

    /// Make extracts of `url` fail.
    pub fn failing_extract(self, url: impl Into<String>) -> Self {
        self.failing_extracts.write().unwrap().insert(url.into());
        self
    }

    /// Answer a crawl from `url` with these page URLs.
    pub fn with_crawl(self, url: impl Into<String>, pages: &[&str]) -> Self {
        let pages = pages.iter().map(|p| p.to_string()).collect();
        self.crawls.write().unwrap().insert(url.into(), pages);
        self
    }

    /// Make crawls from `url` fail.
    pub fn failing_crawl(self, url: impl Into<String>) -> Self {
        self.failing_crawls.write().unwrap().insert(url.into());
        self
    }

    /// Delay every search by `delay`.
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = Some(delay);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockProviderCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn search_count(&self) -> usize {
        self.count(|c| matches!(c, MockProviderCall::Search { .. }))
    }

    pub fn extract_count(&self) -> usize {
        self.count(|c| matches!(c, MockProviderCall::Extract { .. }))
    }

    pub fn crawl_count(&self) -> usize {
        self.count(|c| matches!(c, MockProviderCall::Crawl { .. }))
    }

    fn count(&self, predicate: impl Fn(&MockProviderCall) -> bool) -> usize {
        self.calls.read().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: MockProviderCall) {
        self.calls.write().unwrap().push(call);
    }

    fn mock_failure(target: &str) -> ProviderError {
        ProviderError::Api {
            status: 500,
            body: format!("mock failure for {}", target),
        }
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &str) -> ProviderResult<Vec<SearchHit>> {
        self.record(MockProviderCall::Search {
            query: query.to_string(),
        });

        if let Some(delay) = self.search_delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_searches.read().unwrap().contains(query) {
            return Err(Self::mock_failure(query));
        }

        Ok(self
            .hits
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn extract(&self, url: &str, _depth: ExtractDepth) -> ProviderResult<Vec<ExtractedPage>> {
        self.record(MockProviderCall::Extract {
            url: url.to_string(),
        });

        if self.failing_extracts.read().unwrap().contains(url) {
            return Err(Self::mock_failure(url));
        }

        Ok(self
            .pages
            .read()
            .unwrap()
            .get(url)
            .map(|content| vec![ExtractedPage::new(url, content.clone())])
            .unwrap_or_default())
    }

    async fn crawl(&self, url: &str, instructions: &str) -> ProviderResult<Vec<CrawledPage>> {
        self.record(MockProviderCall::Crawl {
            url: url.to_string(),
            instructions: instructions.to_string(),
        });

        if self.failing_crawls.read().unwrap().contains(url) {
            return Err(Self::mock_failure(url));
        }

        Ok(self
            .crawls
            .read()
            .unwrap()
            .get(url)
            .map(|pages| pages.iter().map(CrawledPage::new).collect())
            .unwrap_or_default())
    }
}

/// Canned answer for one supplier page.
enum SupplierAnswer {
    Record(Supplier),
    Failure,
}

/// A mock extraction model for testing.
///
/// `Queries` requests get the configured query list (empty by default).
/// `Supplier` requests are answered by the first registered marker found in
/// the last message; no match is an error.
#[derive(Default)]
pub struct MockModel {
    queries: Arc<RwLock<Option<serde_json::Value>>>,
    queries_fail: bool,

    /// (content marker, answer), checked in registration order
    suppliers: Arc<RwLock<Vec<(String, SupplierAnswer)>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockModelCall>>>,
}

/// Record of a call made to the mock model.
#[derive(Debug, Clone, PartialEq)]
pub enum MockModelCall {
    Structured {
        shape: String,
        messages: Vec<String>,
    },
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan these queries.
    pub fn with_queries(self, queries: Vec<String>) -> Self {
        *self.queries.write().unwrap() = Some(serde_json::json!({ "queries": queries }));
        self
    }

    /// Answer planning with an arbitrary JSON value.
    pub fn with_raw_queries(self, value: serde_json::Value) -> Self {
        *self.queries.write().unwrap() = Some(value);
        self
    }

    /// Make planning fail.
    pub fn failing_queries(mut self) -> Self {
        self.queries_fail = true;
        self
    }

    /// Structure any content containing `marker` into `supplier`.
    pub fn with_supplier(self, marker: impl Into<String>, supplier: Supplier) -> Self {
        self.suppliers
            .write()
            .unwrap()
            .push((marker.into(), SupplierAnswer::Record(supplier)));
        self
    }

    /// Fail on any content containing `marker`.
    pub fn failing_supplier(self, marker: impl Into<String>) -> Self {
        self.suppliers
            .write()
            .unwrap()
            .push((marker.into(), SupplierAnswer::Failure));
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockModelCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls requesting the named shape.
    pub fn shape_count(&self, name: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|MockModelCall::Structured { shape, .. }| shape.as_str() == name)
            .count()
    }

    fn answer_queries(&self) -> ModelResult<serde_json::Value> {
        if self.queries_fail {
            return Err(ModelError::Api("mock planning failure".to_string()));
        }

        Ok(self
            .queries
            .read()
            .unwrap()
            .clone()
            .unwrap_or_else(|| serde_json::json!({ "queries": [] })))
    }

    fn answer_supplier(&self, content: &str) -> ModelResult<serde_json::Value> {
        let suppliers = self.suppliers.read().unwrap();
        let answer = suppliers
            .iter()
            .find(|(marker, _)| content.contains(marker.as_str()))
            .map(|(_, answer)| answer);

        match answer {
            Some(SupplierAnswer::Record(supplier)) => Ok(serde_json::to_value(supplier)?),
            Some(SupplierAnswer::Failure) => {
                Err(ModelError::Api("mock structuring failure".to_string()))
            }
            None => Err(ModelError::Malformed("no mock supplier for content".to_string())),
        }
    }
}

#[async_trait]
impl ExtractionModel for MockModel {
    async fn generate_structured(
        &self,
        messages: &[Message],
        shape: &TargetShape,
    ) -> ModelResult<serde_json::Value> {
        self.calls.write().unwrap().push(MockModelCall::Structured {
            shape: shape.name.clone(),
            messages: messages.iter().map(|m| m.text().to_string()).collect(),
        });

        match shape.name.as_str() {
            "Queries" => self.answer_queries(),
            "Supplier" => {
                let content = messages.last().map(|m| m.content.as_str()).unwrap_or("");
                self.answer_supplier(content)
            }
            other => Err(ModelError::Malformed(format!("mock has no shape {}", other))),
        }
    }
}
