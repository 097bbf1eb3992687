//! The supplier discovery graph.
//!
//! Fixed topology:
//!
//! ```text
//! start → plan ──(one per query)──▶ search ──(one per retained result)──▶ extract → end
//! ```
//!
//! The two edges out of `plan` and `search` are conditional fan-outs: they read
//! the merged state and emit one [`WorkItem`] per branch. Branches of a stage
//! run concurrently and each returns its own [`StateUpdate`]; once every
//! branch of the stage has finished the updates are applied to the
//! [`RunState`] one at a time, in dispatch order.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{AgentError, Result};
use crate::pipeline::{extract::extract_node, planner::plan_node, search::search_node};
use crate::traits::{model::ExtractionModel, provider::SearchProvider};
use crate::types::{
    company::CompanyProfile,
    config::AgentConfig,
    message::Message,
    search::SearchHit,
    state::{RunState, StateUpdate},
    supplier::Supplier,
};

/// A unit of fan-out work.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkItem {
    /// Search the web for this query
    Query(String),
    /// Extract a supplier from this hit's URL
    SearchHit(SearchHit),
}

/// Graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Plan,
    Search,
    Extract,
    End,
}

/// What the caller gets back from a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunOutput {
    pub suppliers: Vec<Supplier>,

    /// Reserved. Never populated by the graph.
    #[serde(default)]
    pub info: Option<serde_json::Value>,
}

impl From<RunState> for RunOutput {
    fn from(state: RunState) -> Self {
        Self {
            suppliers: state.suppliers,
            info: None,
        }
    }
}

/// Edge out of `plan`: one search branch per planned query.
pub fn continue_to_search(state: &RunState) -> Vec<WorkItem> {
    state
        .queries
        .iter()
        .flatten()
        .cloned()
        .map(WorkItem::Query)
        .collect()
}

/// Edge out of `search`: the first hit of every retained search result.
pub fn continue_to_extract(state: &RunState) -> Vec<WorkItem> {
    state
        .search_results
        .iter()
        .filter_map(|result| result.first_hit())
        .cloned()
        .map(WorkItem::SearchHit)
        .collect()
}

/// Supplier discovery orchestrator.
///
/// # Example
///
/// ```rust,ignore
/// let graph = SupplierGraph::new(TavilyClient::from_env()?, OpenAI::from_env()?);
/// let output = graph
///     .run(CompanyProfile::new("Acme", "Fastener distributor, Pune", "steel bolts"))
///     .await?;
///
/// for supplier in output.suppliers {
///     println!("{}: {:?}", supplier.name, supplier.contact_details.email);
/// }
/// ```
pub struct SupplierGraph<P: SearchProvider, M: ExtractionModel> {
    provider: P,
    model: M,
    config: AgentConfig,
}

impl<P: SearchProvider, M: ExtractionModel> SupplierGraph<P, M> {
    /// Create a graph with default configuration.
    pub fn new(provider: P, model: M) -> Self {
        Self {
            provider,
            model,
            config: AgentConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run discovery for a company profile.
    ///
    /// Fails only if planning fails. Branch failures are logged and leave the
    /// supplier list shorter.
    pub async fn run(&self, profile: CompanyProfile) -> Result<RunOutput> {
        self.run_with_cancellation(profile, CancellationToken::new())
            .await
    }

    /// Run discovery, aborting with [`AgentError::Cancelled`] once `cancel` fires.
    pub async fn run_with_cancellation(
        &self,
        profile: CompanyProfile,
        cancel: CancellationToken,
    ) -> Result<RunOutput> {
        let state = self.run_state(RunState::new(profile), &cancel).await?;
        Ok(state.into())
    }

    /// Run discovery with prior conversational turns, returning the full state.
    pub async fn run_with_history(
        &self,
        profile: CompanyProfile,
        history: Vec<Message>,
    ) -> Result<RunState> {
        let state = RunState::new(profile).with_messages(history);
        self.run_state(state, &CancellationToken::new()).await
    }

    /// Drive the graph from `start` to `end` over an existing state.
    pub async fn run_state(
        &self,
        mut state: RunState,
        cancel: &CancellationToken,
    ) -> Result<RunState> {
        let mut node = Node::Plan;

        while node != Node::End {
            if cancel.is_cancelled() {
                return Err(AgentError::Cancelled);
            }

            node = match node {
                Node::Plan => {
                    let update = tokio::select! {
                        _ = cancel.cancelled() => return Err(AgentError::Cancelled),
                        update = plan_node(&self.model, &state.profile, &state.messages) => update?,
                    };
                    state.apply(update);
                    Node::Search
                }
                Node::Search => {
                    let items = continue_to_search(&state);
                    info!(branches = items.len(), "Dispatching search branches");
                    let updates = self.fan_out(items, cancel).await?;
                    state.apply_all(updates);
                    info!(results = state.search_results.len(), "Search stage complete");
                    Node::Extract
                }
                Node::Extract => {
                    let items = continue_to_extract(&state);
                    info!(branches = items.len(), "Dispatching extraction branches");
                    let updates = self.fan_out(items, cancel).await?;
                    state.apply_all(updates);
                    info!(
                        suppliers = state.suppliers.len(),
                        failures = state.failures.len(),
                        steps = state.loop_step,
                        "Supplier discovery complete"
                    );
                    Node::End
                }
                Node::End => Node::End,
            };
        }

        Ok(state)
    }

    /// Run every work item concurrently (bounded) and collect their updates
    /// in dispatch order.
    async fn fan_out(
        &self,
        items: Vec<WorkItem>,
        cancel: &CancellationToken,
    ) -> Result<Vec<StateUpdate>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let semaphore = Semaphore::new(self.config.max_concurrency.max(1));
        let branches = items.into_iter().map(|item| {
            let semaphore = &semaphore;
            async move {
                // Never closed, so acquire only fails if that changes
                let _permit = semaphore.acquire().await.ok();
                self.dispatch(item).await
            }
        });

        tokio::select! {
            _ = cancel.cancelled() => Err(AgentError::Cancelled),
            updates = join_all(branches) => Ok(updates),
        }
    }

    async fn dispatch(&self, item: WorkItem) -> StateUpdate {
        match item {
            WorkItem::Query(query) => {
                debug!(query = %query, "Search branch started");
                search_node(&self.provider, &query).await
            }
            WorkItem::SearchHit(hit) => {
                debug!(url = %hit.url, "Extraction branch started");
                extract_node(&self.provider, &self.model, &self.config, &hit.url).await
            }
        }
    }
}
