//! Run state and the reducers that merge partial updates into it.
//!
//! Nodes never mutate [`RunState`] directly. Each node invocation (the planner,
//! one search branch, one extraction branch) returns a [`StateUpdate`]; the
//! orchestrator folds those updates into the state one at a time through
//! [`RunState::apply`], which calls exactly one reducer per field.

use serde::{Deserialize, Serialize};

use super::company::CompanyProfile;
use super::message::Message;
use super::search::SearchResult;
use super::supplier::Supplier;

/// The fan-out stage a failed branch belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Search,
    Extract,
}

/// A contained branch failure, kept for observability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchFailure {
    pub stage: Stage,
    /// The query or URL the branch was working on
    pub target: String,
    pub error: String,
}

/// Partial update emitted by a single node invocation.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub messages: Vec<Message>,
    pub loop_step: u32,
    /// `Some` replaces the planned queries
    pub queries: Option<Vec<String>>,
    pub search_results: Vec<SearchResult>,
    pub suppliers: Vec<Supplier>,
    pub failures: Vec<BranchFailure>,
}

impl StateUpdate {
    /// An update that only counts the step.
    pub fn step() -> Self {
        Self {
            loop_step: 1,
            ..Default::default()
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_queries(mut self, queries: Vec<String>) -> Self {
        self.queries = Some(queries);
        self
    }

    pub fn with_search_result(mut self, result: SearchResult) -> Self {
        self.search_results.push(result);
        self
    }

    pub fn with_supplier(mut self, supplier: Supplier) -> Self {
        self.suppliers.push(supplier);
        self
    }

    pub fn with_failure(mut self, failure: BranchFailure) -> Self {
        self.failures.push(failure);
        self
    }
}

/// Aggregate state of one discovery run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub profile: CompanyProfile,

    /// Audit trail. Merged by message id.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Number of node invocations so far. Summed across updates.
    #[serde(default)]
    pub loop_step: u32,

    /// Queries from the planner; `None` until planning has run.
    #[serde(default)]
    pub queries: Option<Vec<String>>,

    /// Search results, unique by first-hit URL.
    #[serde(default)]
    pub search_results: Vec<SearchResult>,

    /// Extracted suppliers, in merge order. Not deduplicated.
    #[serde(default)]
    pub suppliers: Vec<Supplier>,

    #[serde(default)]
    pub failures: Vec<BranchFailure>,
}

impl RunState {
    /// Fresh state for a run.
    pub fn new(profile: CompanyProfile) -> Self {
        Self {
            profile,
            messages: Vec::new(),
            loop_step: 0,
            queries: None,
            search_results: Vec::new(),
            suppliers: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Seed the audit trail with prior conversational turns.
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = reducers::merge_messages(self.messages, messages);
        self
    }

    /// Fold one partial update into the state.
    pub fn apply(&mut self, update: StateUpdate) {
        self.messages = reducers::merge_messages(std::mem::take(&mut self.messages), update.messages);
        self.loop_step = reducers::add_steps(self.loop_step, update.loop_step);
        self.queries = reducers::replace_queries(self.queries.take(), update.queries);
        self.search_results = reducers::add_unique_results(
            std::mem::take(&mut self.search_results),
            update.search_results,
        );
        self.suppliers = reducers::append(std::mem::take(&mut self.suppliers), update.suppliers);
        self.failures = reducers::append(std::mem::take(&mut self.failures), update.failures);
    }

    /// Fold many updates, in order.
    pub fn apply_all(&mut self, updates: impl IntoIterator<Item = StateUpdate>) {
        for update in updates {
            self.apply(update);
        }
    }
}

/// Per-field merge functions: `(old, new) -> merged`.
pub mod reducers {
    use std::collections::HashSet;

    use super::{Message, SearchResult};

    /// Append new messages; a message whose id already exists replaces it in place.
    pub fn merge_messages(mut existing: Vec<Message>, new: Vec<Message>) -> Vec<Message> {
        for message in new {
            match existing.iter_mut().find(|m| m.id == message.id) {
                Some(slot) => *slot = message,
                None => existing.push(message),
            }
        }
        existing
    }

    /// Sum step counts. Saturates instead of wrapping.
    pub fn add_steps(existing: u32, new: u32) -> u32 {
        existing.saturating_add(new)
    }

    /// Last writer wins; `None` leaves the current value alone.
    pub fn replace_queries(
        existing: Option<Vec<String>>,
        new: Option<Vec<String>>,
    ) -> Option<Vec<String>> {
        new.or(existing)
    }

    /// Append results whose URL is non-empty and not yet present.
    pub fn add_unique_results(
        existing: Vec<SearchResult>,
        new: Vec<SearchResult>,
    ) -> Vec<SearchResult> {
        if new.is_empty() {
            return existing;
        }

        let mut seen: HashSet<String> = existing.iter().map(|r| r.url().to_string()).collect();
        let mut merged = existing;
        for result in new {
            let url = result.url();
            if !url.is_empty() && seen.insert(url.to_string()) {
                merged.push(result);
            }
        }
        merged
    }

    /// Plain accumulation.
    pub fn append<T>(mut existing: Vec<T>, new: Vec<T>) -> Vec<T> {
        existing.extend(new);
        existing
    }
}
