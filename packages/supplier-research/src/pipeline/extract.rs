//! Extraction branch: candidate URL → supplier record.
//!
//! Each branch:
//! 1. classifies the URL (logged only, both kinds take the same path)
//! 2. pulls raw page content through the provider's extract operation
//! 3. asks the model for a [`Supplier`] and validates it
//! 4. if the email is missing, makes one best-effort recovery attempt:
//!    crawl for the email, extract the first crawled page, re-structure
//! 5. emits the (possibly recovered) supplier
//!
//! A page with no usable content ends the branch quietly. Provider or model
//! failures end it with a recorded failure. Recovery failures keep the
//! original supplier.

use tracing::{debug, info, warn};

use crate::error::{BranchError, BranchResult};
use crate::pipeline::classify::classify_url;
use crate::traits::model::{generate_as, ExtractionModel};
use crate::traits::provider::SearchProvider;
use crate::types::config::AgentConfig;
use crate::types::message::Message;
use crate::types::search::first_raw_content;
use crate::types::state::{BranchFailure, Stage, StateUpdate};
use crate::types::supplier::Supplier;

/// Ask the model for a supplier and validate it.
///
/// A record without a name or description is [`BranchError::InvalidSupplier`].
pub async fn request_supplier<M>(
    model: &M,
    url: &str,
    messages: &[Message],
) -> BranchResult<Supplier>
where
    M: ExtractionModel + ?Sized,
{
    let supplier: Supplier = generate_as(model, messages)
        .await
        .map_err(|source| BranchError::Model {
            url: url.to_string(),
            source,
        })?;

    supplier
        .validate()
        .map_err(|reason| BranchError::InvalidSupplier {
            url: url.to_string(),
            reason,
        })?;

    Ok(supplier)
}

/// Structure raw page content into a validated supplier.
pub async fn structure_supplier<M>(model: &M, url: &str, content: &str) -> BranchResult<Supplier>
where
    M: ExtractionModel + ?Sized,
{
    request_supplier(model, url, &[Message::user(content)]).await
}

/// One recovery attempt for a supplier whose email is missing.
///
/// Crawls from the original URL with the configured instructions, extracts
/// the first crawled page and structures it again.
pub async fn recover_email<P, M>(
    provider: &P,
    model: &M,
    config: &AgentConfig,
    url: &str,
) -> BranchResult<Supplier>
where
    P: SearchProvider + ?Sized,
    M: ExtractionModel + ?Sized,
{
    let recovery = |reason: String| BranchError::Recovery {
        url: url.to_string(),
        reason,
    };

    let crawled = provider
        .crawl(url, &config.recovery_instructions)
        .await
        .map_err(|e| recovery(format!("crawl failed: {}", e)))?;

    let crawled_url = crawled
        .first()
        .map(|page| page.url.as_str())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| recovery("crawl returned no pages".to_string()))?;

    debug!(url, crawled_url, "Recovery crawl found page");

    let pages = provider
        .extract(crawled_url, config.extract_depth)
        .await
        .map_err(|e| recovery(format!("extract of {} failed: {}", crawled_url, e)))?;

    let content = first_raw_content(&pages)
        .ok_or_else(|| recovery(format!("no content extracted from {}", crawled_url)))?;

    structure_supplier(model, crawled_url, content)
        .await
        .map_err(|e| recovery(e.to_string()))
}

/// A supplier produced by an extraction branch.
#[derive(Debug)]
pub struct Extracted {
    pub supplier: Supplier,

    /// Set when recovery was attempted and failed; `supplier` is then the
    /// original, email-less record.
    pub recovery_error: Option<BranchError>,
}

/// Run the full extraction branch for one candidate URL.
///
/// `Ok(None)` means the page had no usable content.
pub async fn extract_supplier<P, M>(
    provider: &P,
    model: &M,
    config: &AgentConfig,
    url: &str,
) -> BranchResult<Option<Extracted>>
where
    P: SearchProvider + ?Sized,
    M: ExtractionModel + ?Sized,
{
    let website_type = classify_url(url, &config.directory_domains);
    debug!(url, ?website_type, "Processing extraction candidate");

    let pages = provider
        .extract(url, config.extract_depth)
        .await
        .map_err(|source| BranchError::Extraction {
            url: url.to_string(),
            source,
        })?;

    let Some(content) = first_raw_content(&pages) else {
        info!(url, "Could not extract content, skipping");
        return Ok(None);
    };

    let supplier = structure_supplier(model, url, content).await?;

    if !supplier.contact_details.email_missing() {
        return Ok(Some(Extracted {
            supplier,
            recovery_error: None,
        }));
    }

    debug!(url, supplier = %supplier.name, "Email missing, attempting recovery");
    let extracted = match recover_email(provider, model, config, url).await {
        Ok(recovered) => {
            info!(url, supplier = %recovered.name, "Recovery replaced supplier record");
            Extracted {
                supplier: recovered,
                recovery_error: None,
            }
        }
        Err(e) => {
            warn!(error = %e, "Email recovery failed, keeping original supplier");
            Extracted {
                supplier,
                recovery_error: Some(e),
            }
        }
    };

    Ok(Some(extracted))
}

/// Extraction node for one branch. Never fails: errors become recorded failures.
pub async fn extract_node<P, M>(
    provider: &P,
    model: &M,
    config: &AgentConfig,
    url: &str,
) -> StateUpdate
where
    P: SearchProvider + ?Sized,
    M: ExtractionModel + ?Sized,
{
    let failure = |e: &BranchError| BranchFailure {
        stage: Stage::Extract,
        target: url.to_string(),
        error: e.to_string(),
    };

    let update = StateUpdate::step();

    match extract_supplier(provider, model, config, url).await {
        Ok(Some(Extracted {
            supplier,
            recovery_error,
        })) => {
            let update = update.with_supplier(supplier);
            match recovery_error {
                Some(e) => update.with_failure(failure(&e)),
                None => update,
            }
        }
        Ok(None) => update,
        Err(e) => {
            warn!(error = %e, "Extraction branch failed");
            update.with_failure(failure(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockModel, MockProviderCall, MockSearchProvider};
    use crate::types::supplier::ContactDetails;

    const URL: &str = "https://acmesteel.com";

    fn with_email() -> Supplier {
        Supplier::new("Acme Steel", "Bolt manufacturer")
            .with_contact_details(ContactDetails::default().with_email("sales@acmesteel.com"))
    }

    fn without_email() -> Supplier {
        Supplier::new("Acme Steel", "Bolt manufacturer")
            .with_contact_details(ContactDetails::default().with_phone("+91 20 1234"))
    }

    #[tokio::test]
    async fn test_supplier_with_email_skips_recovery() {
        let provider = MockSearchProvider::new().with_page(URL, "ACME PAGE");
        let model = MockModel::new().with_supplier("ACME PAGE", with_email());

        let update = extract_node(&provider, &model, &AgentConfig::default(), URL).await;

        assert_eq!(update.suppliers, vec![with_email()]);
        assert_eq!(provider.crawl_count(), 0);
        assert!(update.failures.is_empty());
    }

    #[tokio::test]
    async fn test_missing_email_recovers_once() {
        let provider = MockSearchProvider::new()
            .with_page(URL, "ACME PAGE")
            .with_crawl(URL, &["https://acmesteel.com/contact"])
            .with_page("https://acmesteel.com/contact", "ACME CONTACT");
        let model = MockModel::new()
            .with_supplier("ACME PAGE", without_email())
            .with_supplier("ACME CONTACT", with_email());

        let update = extract_node(&provider, &model, &AgentConfig::default(), URL).await;

        assert_eq!(update.suppliers, vec![with_email()]);
        assert_eq!(provider.crawl_count(), 1);
        assert!(provider.calls().contains(&MockProviderCall::Crawl {
            url: URL.to_string(),
            instructions: AgentConfig::default().recovery_instructions,
        }));
    }

    #[tokio::test]
    async fn test_recovery_result_without_email_is_not_retried() {
        let provider = MockSearchProvider::new()
            .with_page(URL, "ACME PAGE")
            .with_crawl(URL, &["https://acmesteel.com/about"])
            .with_page("https://acmesteel.com/about", "ACME ABOUT");
        let model = MockModel::new()
            .with_supplier("ACME PAGE", without_email())
            .with_supplier(
                "ACME ABOUT",
                Supplier::new("Acme Steel Pvt Ltd", "Bolts since 1982"),
            );

        let update = extract_node(&provider, &model, &AgentConfig::default(), URL).await;

        assert_eq!(update.suppliers.len(), 1);
        assert_eq!(update.suppliers[0].name, "Acme Steel Pvt Ltd");
        assert_eq!(provider.crawl_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_recovery_keeps_original() {
        let provider = MockSearchProvider::new()
            .with_page(URL, "ACME PAGE")
            .failing_crawl(URL);
        let model = MockModel::new().with_supplier("ACME PAGE", without_email());

        let update = extract_node(&provider, &model, &AgentConfig::default(), URL).await;

        assert_eq!(update.suppliers, vec![without_email()]);
        assert_eq!(provider.crawl_count(), 1);
        assert_eq!(update.failures.len(), 1);
        assert!(update.failures[0].error.contains("recovery"));
    }

    #[tokio::test]
    async fn test_recovery_restructure_failure_keeps_original() {
        let provider = MockSearchProvider::new()
            .with_page(URL, "ACME PAGE")
            .with_crawl(URL, &["https://acmesteel.com/contact"])
            .with_page("https://acmesteel.com/contact", "ACME CONTACT");
        let model = MockModel::new()
            .with_supplier("ACME PAGE", without_email())
            .failing_supplier("ACME CONTACT");

        let extracted = extract_supplier(&provider, &model, &AgentConfig::default(), URL)
            .await
            .unwrap()
            .expect("supplier kept");

        assert_eq!(extracted.supplier, without_email());
        assert!(matches!(
            extracted.recovery_error,
            Some(BranchError::Recovery { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_extract_contributes_nothing() {
        let provider = MockSearchProvider::new();
        let model = MockModel::new();

        let update = extract_node(&provider, &model, &AgentConfig::default(), URL).await;

        assert!(update.suppliers.is_empty());
        assert!(update.failures.is_empty());
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_extract_error_is_contained() {
        let provider = MockSearchProvider::new().failing_extract(URL);
        let model = MockModel::new();

        let update = extract_node(&provider, &model, &AgentConfig::default(), URL).await;

        assert!(update.suppliers.is_empty());
        assert_eq!(update.failures.len(), 1);
        assert_eq!(update.failures[0].stage, Stage::Extract);
    }

    #[tokio::test]
    async fn test_nameless_supplier_is_rejected() {
        let provider = MockSearchProvider::new().with_page(URL, "ACME PAGE");
        let model = MockModel::new().with_supplier("ACME PAGE", Supplier::new("", "Bolts"));

        let outcome = extract_supplier(&provider, &model, &AgentConfig::default(), URL).await;
        assert!(matches!(outcome, Err(BranchError::InvalidSupplier { .. })));
    }

    #[tokio::test]
    async fn test_directory_url_takes_same_path() {
        let url = "https://www.indiamart.com/acme-steel";
        let provider = MockSearchProvider::new().with_page(url, "ACME LISTING");
        let model = MockModel::new().with_supplier("ACME LISTING", with_email());

        let update = extract_node(&provider, &model, &AgentConfig::default(), url).await;
        assert_eq!(update.suppliers.len(), 1);
    }
}
