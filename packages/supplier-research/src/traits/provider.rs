//! Search provider trait: web search, page extraction, guided crawl.
//!
//! The graph only ever needs three operations from the outside web. Tavily
//! exposes all three; anything else (SerpAPI + Firecrawl, a local scraper)
//! can be adapted behind this trait.

use async_trait::async_trait;

use crate::error::ProviderResult;
use crate::types::config::ExtractDepth;
use crate::types::search::{CrawledPage, ExtractedPage, SearchHit};

/// Web search/extract/crawl provider.
///
/// # Implementations
///
/// - [`TavilyClient`](crate::TavilyClient) - Tavily API
/// - [`MockSearchProvider`](crate::testing::MockSearchProvider) - For testing
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search the web. Hits are returned in provider ranking order.
    async fn search(&self, query: &str) -> ProviderResult<Vec<SearchHit>>;

    /// Pull raw page content for a URL.
    ///
    /// An empty list means the provider could not read the page.
    async fn extract(&self, url: &str, depth: ExtractDepth) -> ProviderResult<Vec<ExtractedPage>>;

    /// Crawl outward from `url`, guided by natural-language instructions.
    async fn crawl(&self, url: &str, instructions: &str) -> ProviderResult<Vec<CrawledPage>>;
}
