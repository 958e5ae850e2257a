//! The AI plan stage: ask the model which catalog tools answer a query.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::models::ToolCall;
use crate::ports::LanguageModelPort;
use crate::tools::ToolCatalog;
use crate::util::{extract_json_object, strip_code_fences};

#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(default)]
    tools: Vec<RawPlanEntry>,
}

#[derive(Debug, Deserialize)]
struct RawPlanEntry {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

/// Builds one planning prompt per query and parses the model's plan.
///
/// The prompt carries the machine-readable catalog (names, argument
/// schemas, worked examples), the query, and recent conversation turns.
/// The expected response is `{"tools": [{"name": ..., "arguments": ...}]}`;
/// anything unparseable yields an empty plan, which the selector treats as
/// the signal to fall back to static selection.
#[derive(Debug, Clone)]
pub struct ToolPlanner {
    model: Arc<dyn LanguageModelPort>,
    timeout: Duration,
}

impl ToolPlanner {
    pub fn new(model: Arc<dyn LanguageModelPort>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Plan tool calls for a query. Returns an empty vec on model failure,
    /// timeout, or unparseable output — never an error.
    pub async fn plan(
        &self,
        query: &str,
        catalog: &ToolCatalog,
        recent_history: &[String],
    ) -> Vec<ToolCall> {
        if catalog.is_empty() {
            return Vec::new();
        }

        let prompt = self.build_prompt(query, catalog, recent_history);

        let response = match tokio::time::timeout(self.timeout, self.model.generate(&prompt)).await
        {
            Ok(Ok(text)) => text,
            Ok(Err(error)) => {
                warn!(%error, "tool planner unavailable");
                return Vec::new();
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "tool planner timed out"
                );
                return Vec::new();
            }
        };

        Self::parse_plan(&response)
    }

    fn build_prompt(&self, query: &str, catalog: &ToolCatalog, recent_history: &[String]) -> String {
        let history_block = if recent_history.is_empty() {
            String::new()
        } else {
            format!("Recent conversation:\n{}\n\n", recent_history.join("\n"))
        };

        format!(
            "You are a tool planner for a support assistant. Decide which of the \
             available tools should run to answer the user's query, and with what \
             arguments.\n\
             \n\
             Available tools:\n{}\n\
             {}User query: \"{}\"\n\
             \n\
             Select zero or more tools. Respond with JSON only:\n\
             {{\"tools\": [{{\"name\": \"<tool name>\", \"arguments\": {{...}}}}]}}\n\
             If no tool applies, respond with {{\"tools\": []}}.",
            catalog.prompt_block(),
            history_block,
            query
        )
    }

    fn parse_plan(raw: &str) -> Vec<ToolCall> {
        let stripped = strip_code_fences(raw);
        let Some(object) = extract_json_object(&stripped) else {
            warn!("tool plan contained no JSON object; discarding");
            return Vec::new();
        };

        match serde_json::from_str::<RawPlan>(object) {
            Ok(plan) => plan
                .tools
                .into_iter()
                .map(|entry| ToolCall::new(entry.name, entry.arguments))
                .collect(),
            Err(error) => {
                warn!(%error, "tool plan failed to parse; discarding");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_multi_tool_plan() {
        let raw = r#"{"tools": [
            {"name": "currency_converter", "arguments": {"amount": 100, "from_currency": "USD", "to_currency": "NPR"}},
            {"name": "web_search", "arguments": {"query": "exchange rate news"}}
        ]}"#;
        let plan = ToolPlanner::parse_plan(raw);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].name, "currency_converter");
        assert_eq!(plan[1].arguments, json!({ "query": "exchange rate news" }));
    }

    #[test]
    fn strips_fences_before_parsing() {
        let raw = "```json\n{\"tools\": [{\"name\": \"datetime\"}]}\n```";
        let plan = ToolPlanner::parse_plan(raw);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].arguments, serde_json::Value::Null);
    }

    #[test]
    fn malformed_output_yields_an_empty_plan() {
        assert!(ToolPlanner::parse_plan("I would use the calculator.").is_empty());
        assert!(ToolPlanner::parse_plan(r#"{"tools": "calculator"}"#).is_empty());
    }

    #[test]
    fn explicit_empty_plan_parses_as_empty() {
        assert!(ToolPlanner::parse_plan(r#"{"tools": []}"#).is_empty());
    }
}
