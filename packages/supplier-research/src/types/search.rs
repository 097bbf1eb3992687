//! Provider-facing data: search hits, extracted pages, crawled pages.

use serde::{Deserialize, Serialize};

/// A single hit returned by a web search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// URL of the hit. May be empty if the provider returned garbage.
    pub url: String,

    /// Title of the page (if available from search results).
    #[serde(default)]
    pub title: Option<String>,

    /// Snippet/description from search results.
    #[serde(default)]
    pub snippet: Option<String>,

    /// Relevance score (if provided by the search API).
    #[serde(default)]
    pub score: Option<f64>,
}

impl SearchHit {
    /// Create a hit from a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            snippet: None,
            score: None,
        }
    }

    /// Add a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Add a relevance score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// The outcome of one query's search: the query plus its ordered hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub hits: Vec<SearchHit>,
}

impl SearchResult {
    pub fn new(query: impl Into<String>, hits: Vec<SearchHit>) -> Self {
        Self {
            query: query.into(),
            hits,
        }
    }

    /// The hit that becomes this result's extraction candidate.
    ///
    /// Only the first hit is ever extracted.
    pub fn first_hit(&self) -> Option<&SearchHit> {
        self.hits.first()
    }

    /// Identifying URL used for deduplication (URL of the first hit, or "").
    pub fn url(&self) -> &str {
        self.first_hit().map(|h| h.url.as_str()).unwrap_or("")
    }
}

/// Raw content pulled from a URL by the provider's extract operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub url: String,
    #[serde(default)]
    pub raw_content: Option<String>,
}

impl ExtractedPage {
    pub fn new(url: impl Into<String>, raw_content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            raw_content: Some(raw_content.into()),
        }
    }

    /// Raw content if present and not blank.
    pub fn usable_content(&self) -> Option<&str> {
        self.raw_content
            .as_deref()
            .filter(|content| !content.trim().is_empty())
    }
}

/// A page discovered by the provider's instruction-guided crawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawledPage {
    pub url: String,
    #[serde(default)]
    pub raw_content: Option<String>,
}

impl CrawledPage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            raw_content: None,
        }
    }
}

/// First usable raw content across a list of extracted pages.
///
/// Only the first page is considered, matching how extract results are read.
pub fn first_raw_content(pages: &[ExtractedPage]) -> Option<&str> {
    pages.first().and_then(ExtractedPage::usable_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_url_is_first_hit() {
        let result = SearchResult::new(
            "steel bolts",
            vec![SearchHit::new("https://a.com"), SearchHit::new("https://b.com")],
        );
        assert_eq!(result.url(), "https://a.com");

        let empty = SearchResult::new("nothing", vec![]);
        assert_eq!(empty.url(), "");
        assert!(empty.first_hit().is_none());
    }

    #[test]
    fn test_first_hit_keeps_metadata() {
        let hit = SearchHit::new("https://acmesteel.com")
            .with_title("Acme Steel | M12 bolts")
            .with_snippet("ISO 9001 certified bolt manufacturer")
            .with_score(0.92);
        let result = SearchResult::new("steel bolts", vec![hit.clone(), SearchHit::new("https://b.com")]);

        let first = result.first_hit().unwrap();
        assert_eq!(first, &hit);
        assert_eq!(first.title.as_deref(), Some("Acme Steel | M12 bolts"));
        assert_eq!(first.score, Some(0.92));
    }

    #[test]
    fn test_first_raw_content_skips_blank() {
        let pages = vec![ExtractedPage {
            url: "https://a.com".into(),
            raw_content: Some("  \n".into()),
        }];
        assert!(first_raw_content(&pages).is_none());
        assert!(first_raw_content(&[]).is_none());

        let pages = vec![ExtractedPage::new("https://a.com", "Acme Steel")];
        assert_eq!(first_raw_content(&pages), Some("Acme Steel"));
    }
}
