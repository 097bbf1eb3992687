//! Procurement Research Agent
//!
//! Given a company profile and a procurement requirement, plans web search
//! queries, runs them in parallel, extracts a structured supplier record from
//! the top hit of each search, and makes one best-effort attempt to recover a
//! missing contact email.
//!
//! # Usage
//!
//! ```rust,ignore
//! use supplier_research::{CompanyProfile, SupplierGraph};
//! use supplier_research::testing::{MockModel, MockSearchProvider};
//!
//! let provider = MockSearchProvider::new().with_hits("steel bolts", &["https://acmesteel.com"]);
//! let model = MockModel::new().with_queries(vec!["steel bolts".into()]);
//! let graph = SupplierGraph::new(provider, model);
//!
//! let output = graph
//!     .run(CompanyProfile::new("Acme", "Fastener distributor", "steel bolts"))
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator abstractions (SearchProvider, ExtractionModel)
//! - [`types`] - Profile, supplier, search and run-state types
//! - [`pipeline`] - Planning, search and extraction stages plus the graph
//! - [`providers`] - Search provider implementations (Tavily)
//! - [`ai`] - Extraction model implementations (OpenAI)
//! - [`security`] - API key handling
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod schema;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::EnvConfig;
pub use error::{AgentError, BranchError, ModelError, ProviderError};
pub use pipeline::{scrape_websites, RunOutput, ScrapeOutcome, SupplierGraph, WorkItem};
pub use providers::TavilyClient;
pub use schema::StructuredOutput;
pub use security::ApiKey;
pub use traits::{
    model::{ExtractionModel, TargetShape},
    provider::SearchProvider,
};
pub use types::{
    company::CompanyProfile,
    config::{AgentConfig, ExtractDepth, ModelSpec, SearchDepth},
    message::{Message, Role},
    search::{CrawledPage, ExtractedPage, SearchHit, SearchResult},
    state::{BranchFailure, RunState, Stage, StateUpdate},
    supplier::{ContactDetails, Queries, Supplier},
};
