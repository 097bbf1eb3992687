//! Extraction model trait: messages in, structured JSON out.

use async_trait::async_trait;

use crate::error::{ModelError, ModelResult};
use crate::schema::StructuredOutput;
use crate::types::message::Message;

/// The shape a model response must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetShape {
    /// Schema name (`Queries`, `Supplier`)
    pub name: String,

    /// Strict JSON schema
    pub schema: serde_json::Value,
}

impl TargetShape {
    /// Shape derived from a Rust type.
    pub fn of<T: StructuredOutput>() -> Self {
        Self {
            name: T::type_name(),
            schema: T::strict_schema(),
        }
    }
}

/// LLM that maps free text to a structured record.
///
/// Implementations may leave optional fields empty; callers validate.
///
/// # Implementations
///
/// - [`OpenAI`](crate::ai::OpenAI) - OpenAI chat completions with strict JSON schema
/// - [`MockModel`](crate::testing::MockModel) - For testing
#[async_trait]
pub trait ExtractionModel: Send + Sync {
    /// Generate a JSON value conforming to `shape` from the conversation.
    async fn generate_structured(
        &self,
        messages: &[Message],
        shape: &TargetShape,
    ) -> ModelResult<serde_json::Value>;
}

/// Generate and decode a typed record.
///
/// A response that does not deserialize into `T` is [`ModelError::Malformed`].
pub async fn generate_as<T, M>(model: &M, messages: &[Message]) -> ModelResult<T>
where
    T: StructuredOutput,
    M: ExtractionModel + ?Sized,
{
    let shape = TargetShape::of::<T>();
    let value = model.generate_structured(messages, &shape).await?;
    serde_json::from_value(value).map_err(|e| ModelError::Malformed(format!("{}: {}", shape.name, e)))
}
