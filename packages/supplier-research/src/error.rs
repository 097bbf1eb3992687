//! Typed errors for the supplier research agent.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Branch-level errors
//! never cross [`SupplierGraph::run`](crate::SupplierGraph::run); only
//! [`AgentError`] does.

use thiserror::Error;

/// Errors returned by a [`SearchProvider`](crate::SearchProvider).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider answered with a non-success status
    #[error("provider API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("failed to decode provider response: {0}")]
    Decode(String),

    /// Missing credentials or invalid settings
    #[error("provider config error: {0}")]
    Config(String),
}

/// Errors returned by an [`ExtractionModel`](crate::ExtractionModel).
#[derive(Debug, Error)]
pub enum ModelError {
    /// Configuration error (missing API key, invalid model name)
    #[error("model config error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("model network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, invalid request)
    #[error("model API error: {0}")]
    Api(String),

    /// The model answered with something that is not the requested shape
    #[error("model returned malformed output: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Failure of a single fan-out branch.
///
/// Contained at the branch boundary: logged, recorded in
/// [`RunState::failures`](crate::RunState), never propagated.
#[derive(Debug, Error)]
pub enum BranchError {
    /// One query's search failed
    #[error("search failed for query '{query}': {source}")]
    Search {
        query: String,
        #[source]
        source: ProviderError,
    },

    /// Extract call for a candidate URL failed
    #[error("extract failed for {url}: {source}")]
    Extraction {
        url: String,
        #[source]
        source: ProviderError,
    },

    /// Structuring the page content into a supplier failed
    #[error("supplier structuring failed for {url}: {source}")]
    Model {
        url: String,
        #[source]
        source: ModelError,
    },

    /// Model produced a supplier without a name or description
    #[error("invalid supplier record from {url}: {reason}")]
    InvalidSupplier { url: String, reason: String },

    /// Best-effort email recovery failed; the original supplier is kept
    #[error("email recovery failed for {url}: {reason}")]
    Recovery { url: String, reason: String },
}

/// Run-level errors. Only these escape the orchestrator.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Query generation failed or returned an unusable shape
    #[error("query planning failed: {0}")]
    Planning(#[source] ModelError),

    /// Run was cancelled through its cancellation token
    #[error("run cancelled")]
    Cancelled,
}

/// Result type alias for run-level operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Result type alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Result type alias for model operations.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Result type alias for branch operations.
pub type BranchResult<T> = std::result::Result<T, BranchError>;
