use anyhow::{Context, Result};
use dotenvy::dotenv;
use url::Url;

use crate::security::ApiKey;

/// Credentials and endpoints loaded from environment variables
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub tavily_api_key: ApiKey,
    pub openai_api_key: ApiKey,
    /// `SUPPLIER_MODEL`, in `provider/model` form
    pub model: Option<String>,
    /// `OPENAI_BASE_URL`, for OpenAI-compatible gateways
    pub openai_base_url: Option<Url>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openai_base_url = var("OPENAI_BASE_URL")
            .map(|raw| Url::parse(&raw))
            .transpose()
            .context("OPENAI_BASE_URL must be a valid URL")?;

        Ok(Self {
            tavily_api_key: var("TAVILY_API_KEY")
                .map(ApiKey::new)
                .context("TAVILY_API_KEY must be set")?,
            openai_api_key: var("OPENAI_API_KEY")
                .map(ApiKey::new)
                .context("OPENAI_API_KEY must be set")?,
            model: var("SUPPLIER_MODEL"),
            openai_base_url,
        })
    }
}
