//! Configuration types for a discovery run.

use serde::{Deserialize, Serialize};

/// Directory sites that list many suppliers rather than being one.
pub const DEFAULT_DIRECTORY_DOMAINS: [&str; 4] =
    ["indiamart", "tradeindia", "justdial", "yellowpages"];

/// Crawl instructions used when a supplier's email is missing.
pub const DEFAULT_RECOVERY_INSTRUCTIONS: &str = "Extract the email address of the supplier";

/// Search depth for the provider's search operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

/// Depth of the provider's extract operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractDepth {
    Basic,
    #[default]
    Advanced,
}

impl ExtractDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

/// A `provider/model` identifier such as `openai/gpt-4o-mini`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    /// Provider prefix, if one was given
    pub provider: Option<String>,
    pub model: String,
}

impl ModelSpec {
    /// Split on the first `/`. Without a slash the whole string is the model.
    pub fn parse(fully_specified: &str) -> Self {
        match fully_specified.split_once('/') {
            Some((provider, model)) => Self {
                provider: Some(provider.to_string()),
                model: model.to_string(),
            },
            None => Self {
                provider: None,
                model: fully_specified.to_string(),
            },
        }
    }
}

/// Configuration for the supplier discovery graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model identifier in `provider/model` form.
    ///
    /// Default: `openai/gpt-4o-mini`.
    pub model: String,

    /// Maximum hits requested per search query.
    ///
    /// Only the first hit is extracted, but directory-heavy result pages
    /// benefit from a few more. Default: 5.
    pub max_search_results: usize,

    /// Search depth. Default: basic.
    pub search_depth: SearchDepth,

    /// Extract depth for candidate pages. Default: advanced.
    pub extract_depth: ExtractDepth,

    /// Substrings that mark a URL as a supplier directory.
    #[serde(default)]
    pub directory_domains: Vec<String>,

    /// Instructions passed to crawl when recovering a missing email.
    pub recovery_instructions: String,

    /// Maximum branches in flight per fan-out stage.
    ///
    /// Default: 8.
    pub max_concurrency: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "openai/gpt-4o-mini".to_string(),
            max_search_results: 5,
            search_depth: SearchDepth::Basic,
            extract_depth: ExtractDepth::Advanced,
            directory_domains: DEFAULT_DIRECTORY_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            recovery_instructions: DEFAULT_RECOVERY_INSTRUCTIONS.to_string(),
            max_concurrency: 8,
        }
    }
}

impl AgentConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max search results per query.
    pub fn with_max_search_results(mut self, max: usize) -> Self {
        self.max_search_results = max;
        self
    }

    /// Set search depth.
    pub fn with_search_depth(mut self, depth: SearchDepth) -> Self {
        self.search_depth = depth;
        self
    }

    /// Set extract depth.
    pub fn with_extract_depth(mut self, depth: ExtractDepth) -> Self {
        self.extract_depth = depth;
        self
    }

    /// Replace the directory list.
    pub fn with_directory_domains(
        mut self,
        domains: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.directory_domains = domains.into_iter().map(|d| d.into()).collect();
        self
    }

    /// Set recovery crawl instructions.
    pub fn with_recovery_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.recovery_instructions = instructions.into();
        self
    }

    /// Set the per-stage concurrency limit. Zero is treated as one.
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    /// Parsed model identifier.
    pub fn model_spec(&self) -> ModelSpec {
        ModelSpec::parse(&self.model)
    }
}
