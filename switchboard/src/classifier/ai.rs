//! AI-tier classification: prompt a language model for a structured
//! routing decision and parse it permissively.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::classifier::ClassifierStrategy;
use crate::models::{Route, RoutingDecision};
use crate::ports::LanguageModelPort;
use crate::util::{extract_json_object, strip_code_fences};

/// Confidence assumed when the model omits one. Matches the rule tier's
/// escalation threshold so an evasive model neither dominates nor
/// disappears.
const DEFAULT_AI_CONFIDENCE: f32 = 0.5;

#[derive(Debug, Deserialize)]
struct RawDecision {
    route: Option<String>,
    approach: Option<String>,
    tool: Option<String>,
    confidence: Option<f32>,
    reasoning: Option<String>,
    search_query: Option<String>,
}

/// The AI tier of the classification chain.
///
/// Sends one prompt enumerating the route taxonomy (and the tool names it
/// may pick from) and expects a JSON object back. Model errors, timeouts,
/// and unparseable output all degrade to "no opinion"; this tier can never
/// fail the classification call.
#[derive(Debug, Clone)]
pub struct AiStrategy {
    model: Arc<dyn LanguageModelPort>,
    timeout: Duration,
    tool_names: Vec<String>,
}

impl AiStrategy {
    /// Create an AI tier over an injected model port with a bounded wait.
    pub fn new(model: Arc<dyn LanguageModelPort>, timeout: Duration) -> Self {
        Self {
            model,
            timeout,
            tool_names: Vec::new(),
        }
    }

    /// Let the prompt enumerate the tools a `tools_only` decision may name.
    pub fn with_tool_names(mut self, tool_names: Vec<String>) -> Self {
        self.tool_names = tool_names;
        self
    }

    fn build_prompt(&self, query: &str, context: Option<&serde_json::Value>) -> String {
        let tool_line = if self.tool_names.is_empty() {
            String::new()
        } else {
            format!("Available tools: {}\n", self.tool_names.join(", "))
        };
        let context_line = match context {
            Some(value) if !value.is_null() => format!("Session context: {value}\n"),
            _ => String::new(),
        };

        format!(
            "You are a query classifier for a support assistant. Analyze the user \
             query and decide how it should be answered.\n\
             \n\
             Routes:\n\
             - tools_only: direct tool invocations (calculations, conversions, status \
             checks, live lookups)\n\
             - retrieval: answers found in indexed documentation (how-tos, concepts, \
             API usage)\n\
             - combined: needs both a tool result and documentation context\n\
             - conversational: greetings, small talk, or recalling earlier \
             conversation\n\
             \n\
             {tool_line}User query: \"{query}\"\n\
             {context_line}\
             \n\
             Respond with JSON only:\n\
             {{\n\
               \"route\": \"tools_only|retrieval|combined|conversational\",\n\
               \"tool\": \"<tool name or null>\",\n\
               \"confidence\": <0.0-1.0>,\n\
               \"reasoning\": \"<one sentence>\",\n\
               \"search_query\": \"<reformulated retrieval query or null>\"\n\
             }}"
        )
    }

    fn parse_decision(raw: &str) -> Option<RoutingDecision> {
        let stripped = strip_code_fences(raw);
        let object = extract_json_object(&stripped)?;
        let parsed: RawDecision = serde_json::from_str(object).ok()?;

        // "route" is the required field; some models answer with the
        // legacy "approach" key instead.
        let route_raw = parsed.route.or(parsed.approach)?;
        let route = Route::from_keyword(&route_raw)?;

        let mut decision = RoutingDecision::new(
            route,
            parsed.confidence.unwrap_or(DEFAULT_AI_CONFIDENCE),
            parsed
                .reasoning
                .unwrap_or_else(|| "model classification".to_string()),
        );
        if let Some(tool) = parsed.tool.filter(|t| !t.is_empty()) {
            decision = decision.with_tool(tool);
        }
        if let Some(search_query) = parsed.search_query.filter(|q| !q.is_empty()) {
            decision = decision.with_search_query(search_query);
        }
        Some(decision)
    }
}

#[async_trait]
impl ClassifierStrategy for AiStrategy {
    async fn classify(
        &self,
        query: &str,
        context: Option<&serde_json::Value>,
    ) -> Option<RoutingDecision> {
        let prompt = self.build_prompt(query, context);

        let response = match tokio::time::timeout(self.timeout, self.model.generate(&prompt)).await
        {
            Ok(Ok(text)) => text,
            Ok(Err(error)) => {
                warn!(%error, "AI classification tier unavailable");
                return None;
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "AI classification tier timed out");
                return None;
            }
        };

        let decision = Self::parse_decision(&response);
        if decision.is_none() {
            warn!("AI classification response was unparseable; discarding");
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_clean_response() {
        let raw = r#"{"route": "retrieval", "tool": null, "confidence": 0.8, "reasoning": "doc question", "search_query": "webhook setup"}"#;
        let decision = AiStrategy::parse_decision(raw).expect("parses");
        assert_eq!(decision.route, Route::Retrieval);
        assert_eq!(decision.confidence, 0.8);
        assert_eq!(decision.search_query.as_deref(), Some("webhook setup"));
    }

    #[test]
    fn tolerates_fences_and_commentary() {
        let raw = "Here you go:\n```json\n{\"route\": \"combined\", \"confidence\": 0.7}\n```\nLet me know!";
        let decision = AiStrategy::parse_decision(raw).expect("parses");
        assert_eq!(decision.route, Route::Combined);
    }

    #[test]
    fn accepts_the_legacy_approach_key() {
        let raw = r#"{"approach": "MCP_TOOLS_ONLY", "confidence": 0.9}"#;
        let decision = AiStrategy::parse_decision(raw).expect("parses");
        assert_eq!(decision.route, Route::ToolsOnly);
    }

    #[test]
    fn missing_confidence_gets_the_default() {
        let raw = r#"{"route": "conversational"}"#;
        let decision = AiStrategy::parse_decision(raw).expect("parses");
        assert_eq!(decision.confidence, DEFAULT_AI_CONFIDENCE);
    }

    #[test]
    fn missing_route_is_unusable() {
        assert!(AiStrategy::parse_decision(r#"{"confidence": 0.9}"#).is_none());
        assert!(AiStrategy::parse_decision("not json at all").is_none());
        assert!(AiStrategy::parse_decision(r#"{"route": "teleport"}"#).is_none());
    }
}
