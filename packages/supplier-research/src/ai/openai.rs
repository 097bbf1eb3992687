//! OpenAI implementation of the extraction model.
//!
//! Uses chat completions with a strict `json_schema` response format, so the
//! model is forced to produce every required field of the target shape.
//!
//! # Example
//!
//! ```rust,ignore
//! use supplier_research::ai::OpenAI;
//!
//! let model = OpenAI::from_env()?.with_model("gpt-4o");
//! let graph = SupplierGraph::new(provider, model);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::security::ApiKey;
use crate::traits::model::{ExtractionModel, TargetShape};
use crate::types::config::ModelSpec;
use crate::types::message::{Message, Role};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct StructuredRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat<'a>,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// OpenAI-based extraction model.
#[derive(Clone)]
pub struct OpenAI {
    client: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl OpenAI {
    /// Create a new client with the given API key. Default model: gpt-4o-mini.
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> ModelResult<Self> {
        let key = ApiKey::from_env("OPENAI_API_KEY")
            .ok_or_else(|| ModelError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(key))
    }

    /// Set the chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the model from a `provider/model` spec.
    ///
    /// Only the `openai` provider (or no provider) is accepted.
    pub fn with_model_spec(self, spec: &ModelSpec) -> ModelResult<Self> {
        match spec.provider.as_deref() {
            None | Some("openai") => Ok(self.with_model(spec.model.clone())),
            Some(other) => Err(ModelError::Config(format!(
                "unsupported model provider '{}'",
                other
            ))),
        }
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ExtractionModel for OpenAI {
    async fn generate_structured(
        &self,
        messages: &[Message],
        shape: &TargetShape,
    ) -> ModelResult<serde_json::Value> {
        let request = StructuredRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: role_name(m.role),
                    content: &m.content,
                })
                .collect(),
            temperature: 0.0,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: &shape.name,
                    strict: true,
                    schema: &shape.schema,
                },
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", self.api_key.bearer())
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ModelError::Api(format!("{}: {}", status, error_text)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Malformed(e.to_string()))?;

        let message = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| ModelError::Malformed("no choices in response".into()))?;

        if let Some(refusal) = message.refusal {
            return Err(ModelError::Api(format!("model refused: {}", refusal)));
        }

        let content = message
            .content
            .ok_or_else(|| ModelError::Malformed("empty message content".into()))?;

        debug!(shape = %shape.name, model = %self.model, "Structured output received");
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_model_spec() {
        let model = OpenAI::new("sk-test")
            .with_model_spec(&ModelSpec::parse("openai/gpt-4o"))
            .unwrap();
        assert_eq!(model.model(), "gpt-4o");

        assert!(OpenAI::new("sk-test")
            .with_model_spec(&ModelSpec::parse("anthropic/claude"))
            .is_err());
    }

    #[test]
    fn test_request_serializes_schema_format() {
        let shape = TargetShape {
            name: "Queries".into(),
            schema: serde_json::json!({"type": "object"}),
        };
        let request = StructuredRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: 0.0,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: &shape.name,
                    strict: true,
                    schema: &shape.schema,
                },
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_schema");
        assert_eq!(value["response_format"]["json_schema"]["name"], "Queries");
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
