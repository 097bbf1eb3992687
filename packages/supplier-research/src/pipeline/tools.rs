//! Direct scraping entry point, used outside the graph.
//!
//! Sequential over the given URLs, one model call per business website, no
//! recovery crawl. Supplier directories are set aside without extraction.

use tracing::{debug, info, warn};

use crate::error::{BranchError, BranchResult};
use crate::pipeline::classify::{classify_url, WebsiteType};
use crate::pipeline::extract::request_supplier;
use crate::pipeline::prompts::format_supplier_prompt;
use crate::traits::model::ExtractionModel;
use crate::traits::provider::SearchProvider;
use crate::types::config::AgentConfig;
use crate::types::message::Message;
use crate::types::search::first_raw_content;
use crate::types::supplier::Supplier;

/// Result of [`scrape_websites`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeOutcome {
    /// Suppliers extracted from business websites, in URL order
    pub suppliers: Vec<Supplier>,

    /// Directory URLs that were flagged for crawling but not extracted
    pub directory_urls: Vec<String>,
}

/// Scrape each URL and extract one supplier per business website.
///
/// A URL that fails at any step is logged and skipped.
pub async fn scrape_websites<P, M>(
    provider: &P,
    model: &M,
    config: &AgentConfig,
    urls: &[String],
) -> ScrapeOutcome
where
    P: SearchProvider + ?Sized,
    M: ExtractionModel + ?Sized,
{
    let mut outcome = ScrapeOutcome::default();

    for url in urls {
        if classify_url(url, &config.directory_domains) == WebsiteType::SupplierDirectory {
            debug!(url = %url, "Supplier directory, queued for crawl");
            outcome.directory_urls.push(url.clone());
            continue;
        }

        match scrape_website(provider, model, config, url).await {
            Ok(Some(supplier)) => outcome.suppliers.push(supplier),
            Ok(None) => debug!(url = %url, "No content extracted"),
            Err(e) => warn!(error = %e, "Scrape failed, skipping URL"),
        }
    }

    info!(
        urls = urls.len(),
        suppliers = outcome.suppliers.len(),
        directories = outcome.directory_urls.len(),
        "Scraped websites"
    );

    outcome
}

async fn scrape_website<P, M>(
    provider: &P,
    model: &M,
    config: &AgentConfig,
    url: &str,
) -> BranchResult<Option<Supplier>>
where
    P: SearchProvider + ?Sized,
    M: ExtractionModel + ?Sized,
{
    let pages = provider
        .extract(url, config.extract_depth)
        .await
        .map_err(|source| BranchError::Extraction {
            url: url.to_string(),
            source,
        })?;

    let Some(content) = first_raw_content(&pages) else {
        return Ok(None);
    };

    let prompt = format_supplier_prompt(url, content);
    let supplier = request_supplier(model, url, &[Message::user(prompt)]).await?;

    Ok(Some(supplier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockModel, MockModelCall, MockSearchProvider};

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn test_scrape_business_websites_in_order() {
        let provider = MockSearchProvider::new()
            .with_page("https://acmesteel.com", "ACME PAGE")
            .with_page("https://boltco.in", "BOLTCO PAGE");
        let model = MockModel::new()
            .with_supplier("ACME PAGE", Supplier::new("Acme Steel", "Bolts"))
            .with_supplier("BOLTCO PAGE", Supplier::new("BoltCo", "Fasteners"));

        let outcome = scrape_websites(
            &provider,
            &model,
            &AgentConfig::default(),
            &urls(&["https://acmesteel.com", "https://boltco.in"]),
        )
        .await;

        let names: Vec<_> = outcome.suppliers.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Acme Steel", "BoltCo"]);
        assert!(outcome.directory_urls.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_carries_url_and_schema() {
        let provider = MockSearchProvider::new().with_page("https://acmesteel.com", "ACME PAGE");
        let model =
            MockModel::new().with_supplier("ACME PAGE", Supplier::new("Acme Steel", "Bolts"));

        scrape_websites(
            &provider,
            &model,
            &AgentConfig::default(),
            &urls(&["https://acmesteel.com"]),
        )
        .await;

        let calls = model.calls();
        let MockModelCall::Structured { shape, messages } = &calls[0];
        assert_eq!(shape, "Supplier");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("You just scraped the following website: https://acmesteel.com"));
        assert!(messages[0].contains("contact_details"));
    }

    #[tokio::test]
    async fn test_directories_are_not_extracted() {
        let provider = MockSearchProvider::new();
        let model = MockModel::new();

        let outcome = scrape_websites(
            &provider,
            &model,
            &AgentConfig::default(),
            &urls(&["https://www.indiamart.com/acme"]),
        )
        .await;

        assert!(outcome.suppliers.is_empty());
        assert_eq!(outcome.directory_urls, urls(&["https://www.indiamart.com/acme"]));
        assert_eq!(provider.extract_count(), 0);
        assert_eq!(provider.crawl_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_url_is_skipped() {
        let provider = MockSearchProvider::new()
            .failing_extract("https://down.example")
            .with_page("https://acmesteel.com", "ACME PAGE");
        let model =
            MockModel::new().with_supplier("ACME PAGE", Supplier::new("Acme Steel", "Bolts"));

        let outcome = scrape_websites(
            &provider,
            &model,
            &AgentConfig::default(),
            &urls(&["https://down.example", "https://acmesteel.com"]),
        )
        .await;

        assert_eq!(outcome.suppliers.len(), 1);
        assert_eq!(provider.crawl_count(), 0, "no recovery on the direct path");
    }

    #[tokio::test]
    async fn test_invalid_supplier_is_skipped() {
        let provider = MockSearchProvider::new()
            .with_page("https://blank.example", "BLANK PAGE")
            .with_page("https://acmesteel.com", "ACME PAGE");
        let model = MockModel::new()
            .with_supplier("BLANK PAGE", Supplier::new("", "  "))
            .with_supplier("ACME PAGE", Supplier::new("Acme Steel", "Bolts"));

        let outcome = scrape_websites(
            &provider,
            &model,
            &AgentConfig::default(),
            &urls(&["https://blank.example", "https://acmesteel.com"]),
        )
        .await;

        assert_eq!(outcome.suppliers, vec![Supplier::new("Acme Steel", "Bolts")]);
        assert!(outcome.suppliers.iter().all(|s| s.validate().is_ok()));
    }

    #[tokio::test]
    async fn test_scrape_website_reports_invalid_supplier() {
        let provider = MockSearchProvider::new().with_page("https://blank.example", "BLANK PAGE");
        let model = MockModel::new().with_supplier("BLANK PAGE", Supplier::new("Acme", ""));

        let result =
            scrape_website(&provider, &model, &AgentConfig::default(), "https://blank.example").await;

        assert!(matches!(result, Err(BranchError::InvalidSupplier { .. })));
    }
}
