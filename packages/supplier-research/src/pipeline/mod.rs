//! Supplier discovery pipeline.
//!
//! - [`planner`] - Company profile to search queries
//! - [`search`] - One search branch per query
//! - [`extract`] - One extraction branch per candidate URL, with email recovery
//! - [`graph`] - Orchestrator wiring the stages together
//! - [`tools`] - Sequential scraping outside the graph

pub mod classify;
pub mod extract;
pub mod graph;
pub mod planner;
pub mod prompts;
pub mod search;
pub mod tools;

pub use classify::{classify_url, directory_name, WebsiteType};
pub use extract::{
    extract_node, extract_supplier, recover_email, request_supplier, structure_supplier, Extracted,
};
pub use graph::{continue_to_extract, continue_to_search, RunOutput, SupplierGraph, WorkItem};
pub use planner::{plan_node, plan_queries};
pub use search::{search_node, search_query};
pub use tools::{scrape_websites, ScrapeOutcome};
