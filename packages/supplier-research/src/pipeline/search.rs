//! Search branch: one query → one search result.

use tracing::{debug, warn};

use crate::error::{BranchError, BranchResult};
use crate::traits::provider::SearchProvider;
use crate::types::search::SearchResult;
use crate::types::state::{BranchFailure, Stage, StateUpdate};

/// Run one query against the provider.
///
/// Returns `None` when the search yields zero hits.
pub async fn search_query<P>(provider: &P, query: &str) -> BranchResult<Option<SearchResult>>
where
    P: SearchProvider + ?Sized,
{
    let hits = provider
        .search(query)
        .await
        .map_err(|source| BranchError::Search {
            query: query.to_string(),
            source,
        })?;

    if hits.is_empty() {
        debug!(query, "Search returned no hits");
        return Ok(None);
    }

    Ok(Some(SearchResult::new(query, hits)))
}

/// Search node for one branch. Never fails: errors become a recorded failure.
pub async fn search_node<P>(provider: &P, query: &str) -> StateUpdate
where
    P: SearchProvider + ?Sized,
{
    let update = StateUpdate::step();

    match search_query(provider, query).await {
        Ok(Some(result)) => {
            debug!(query, url = result.url(), hits = result.hits.len(), "Search branch complete");
            update.with_search_result(result)
        }
        Ok(None) => update,
        Err(e) => {
            warn!(error = %e, "Search branch failed");
            update.with_failure(BranchFailure {
                stage: Stage::Search,
                target: query.to_string(),
                error: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSearchProvider;

    #[tokio::test]
    async fn test_search_node_emits_one_result() {
        let provider = MockSearchProvider::new()
            .with_hits("steel bolts", &["https://acmesteel.com", "https://boltco.in"]);

        let update = search_node(&provider, "steel bolts").await;
        assert_eq!(update.search_results.len(), 1);
        assert_eq!(update.search_results[0].hits.len(), 2);
        assert_eq!(update.search_results[0].url(), "https://acmesteel.com");
        assert_eq!(update.loop_step, 1);
    }

    #[tokio::test]
    async fn test_search_node_zero_hits_contributes_nothing() {
        let provider = MockSearchProvider::new();
        let update = search_node(&provider, "nothing").await;
        assert!(update.search_results.is_empty());
        assert!(update.failures.is_empty());
    }

    #[tokio::test]
    async fn test_search_node_failure_is_contained() {
        let provider = MockSearchProvider::new().failing_search("boom");
        let update = search_node(&provider, "boom").await;
        assert!(update.search_results.is_empty());
        assert_eq!(update.failures.len(), 1);
        assert_eq!(update.failures[0].stage, Stage::Search);
        assert_eq!(update.failures[0].target, "boom");
    }
}
