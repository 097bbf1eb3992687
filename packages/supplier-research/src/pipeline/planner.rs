//! Query planning: company profile → web search queries.

use tracing::{debug, info};

use crate::error::{AgentError, Result};
use crate::pipeline::prompts::format_planner_prompt;
use crate::traits::model::{generate_as, ExtractionModel};
use crate::types::company::CompanyProfile;
use crate::types::message::Message;
use crate::types::state::StateUpdate;
use crate::types::supplier::Queries;

/// Ask the model for search queries.
///
/// The prompt goes first, followed by any prior conversational turns. The
/// returned list is used verbatim: no dedup, no cap. An empty list is valid.
pub async fn plan_queries<M>(
    model: &M,
    profile: &CompanyProfile,
    history: &[Message],
) -> Result<Vec<String>>
where
    M: ExtractionModel + ?Sized,
{
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Message::user(format_planner_prompt(profile)));
    messages.extend_from_slice(history);

    let queries: Queries = generate_as(model, &messages)
        .await
        .map_err(AgentError::Planning)?;

    info!(
        company = %profile.company_name,
        queries = queries.queries.len(),
        "Planned search queries"
    );
    debug!(queries = ?queries.queries, "Planner output");

    Ok(queries.queries)
}

/// Planner node: plan queries and record them in the audit trail.
pub async fn plan_node<M>(
    model: &M,
    profile: &CompanyProfile,
    history: &[Message],
) -> Result<StateUpdate>
where
    M: ExtractionModel + ?Sized,
{
    let queries = plan_queries(model, profile, history).await?;
    let record = Message::assistant(format!(
        "Planned {} search queries:\n{}",
        queries.len(),
        queries.join("\n")
    ));

    Ok(StateUpdate::step()
        .with_messages(vec![record])
        .with_queries(queries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockModel, MockModelCall};

    fn profile() -> CompanyProfile {
        CompanyProfile::new("Acme", "Fastener distributor", "steel bolts")
    }

    #[tokio::test]
    async fn test_plan_returns_queries_verbatim() {
        let model = MockModel::new().with_queries(vec![
            "steel bolts supplier India".into(),
            "steel bolts supplier India".into(),
        ]);

        let queries = plan_queries(&model, &profile(), &[]).await.unwrap();
        assert_eq!(queries.len(), 2, "duplicates are not removed");
    }

    #[tokio::test]
    async fn test_plan_prompt_precedes_history() {
        let model = MockModel::new().with_queries(vec![]);
        let history = vec![Message::user("focus on ISO certified vendors")];

        plan_queries(&model, &profile(), &history).await.unwrap();

        match &model.calls()[0] {
            MockModelCall::Structured { shape, messages } => {
                assert_eq!(shape, "Queries");
                assert_eq!(messages.len(), 2);
                assert!(messages[0].contains("steel bolts"));
                assert_eq!(messages[1], "focus on ISO certified vendors");
            }
        }
    }

    #[tokio::test]
    async fn test_plan_failure_is_planning_error() {
        let model = MockModel::new().failing_queries();
        let err = plan_queries(&model, &profile(), &[]).await.unwrap_err();
        assert!(matches!(err, AgentError::Planning(_)));
    }

    #[tokio::test]
    async fn test_malformed_queries_is_planning_error() {
        let model = MockModel::new().with_raw_queries(serde_json::json!({"items": ["a"]}));
        let err = plan_queries(&model, &profile(), &[]).await.unwrap_err();
        assert!(matches!(err, AgentError::Planning(_)));
    }

    #[tokio::test]
    async fn test_plan_node_records_message() {
        let model = MockModel::new().with_queries(vec!["fastener manufacturer ISO".into()]);
        let update = plan_node(&model, &profile(), &[]).await.unwrap();

        assert_eq!(update.loop_step, 1);
        assert_eq!(update.messages.len(), 1);
        assert_eq!(update.queries, Some(vec!["fastener manufacturer ISO".to_string()]));
    }
}
