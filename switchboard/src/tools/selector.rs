//! Plan, validate, execute — with a deterministic static fallback.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde_json::json;
use tracing::{debug, warn};

use crate::classifier::match_tool_trigger;
use crate::models::{RoutingDecision, ToolCall, ToolResult};
use crate::ports::ToolExecutionPort;
use crate::tools::{ToolCatalog, ToolPlanner};

/// Selects and executes tools for a query.
///
/// The AI plan stage proposes calls; each is validated against the closed
/// catalog, and survivors execute independently against the execution port
/// with their own timeouts. One tool's failure is recorded in its
/// [`ToolResult`] and never cancels its siblings. An empty or unusable plan
/// falls back to a static name lookup derived from the classification, so
/// the system degrades to deterministic behavior when the planning model
/// misbehaves.
#[derive(Debug, Clone)]
pub struct ToolSelector {
    planner: Option<ToolPlanner>,
    executor: Arc<dyn ToolExecutionPort>,
    tool_timeout: Duration,
}

impl ToolSelector {
    /// Create a selector with an AI planner.
    pub fn new(
        planner: ToolPlanner,
        executor: Arc<dyn ToolExecutionPort>,
        tool_timeout: Duration,
    ) -> Self {
        Self {
            planner: Some(planner),
            executor,
            tool_timeout,
        }
    }

    /// Create a selector with no planner; every query takes the static
    /// path. For deployments without a planning model.
    pub fn static_only(executor: Arc<dyn ToolExecutionPort>, tool_timeout: Duration) -> Self {
        Self {
            planner: None,
            executor,
            tool_timeout,
        }
    }

    /// Select and execute tools for `query`, returning results keyed by
    /// tool name. Never fails: planning errors fall back to the static
    /// path, and execution errors become failure records.
    pub async fn select_and_execute(
        &self,
        query: &str,
        catalog: &ToolCatalog,
        classification: &RoutingDecision,
        recent_history: &[String],
    ) -> HashMap<String, ToolResult> {
        let mut calls = match &self.planner {
            Some(planner) => {
                let planned = planner.plan(query, catalog, recent_history).await;
                self.retain_valid(planned, catalog)
            }
            None => Vec::new(),
        };

        if calls.is_empty() {
            calls = Self::static_plan(query, catalog, classification);
            if !calls.is_empty() {
                debug!(
                    tools = ?calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                    "plan stage produced nothing usable; using static selection"
                );
            }
        }

        self.execute_all(calls).await
    }

    /// Drop planned calls the catalog rejects, deduplicating by name
    /// (first occurrence wins) so the result map is unambiguous.
    fn retain_valid(&self, planned: Vec<ToolCall>, catalog: &ToolCatalog) -> Vec<ToolCall> {
        let mut seen = std::collections::HashSet::new();
        let mut valid = Vec::new();

        for call in planned {
            if !seen.insert(call.name.clone()) {
                continue;
            }
            match catalog.validate_call(&call) {
                Ok(()) => valid.push(call),
                Err(error) => {
                    warn!(tool = %call.name, %error, "dropping planned call");
                }
            }
        }

        valid
    }

    /// The legacy single-argument path: look the tool up by the
    /// classification's declared name (or the trigger vocabulary when the
    /// decision carries none) and pass the raw query text as the sole
    /// argument.
    fn static_plan(
        query: &str,
        catalog: &ToolCatalog,
        classification: &RoutingDecision,
    ) -> Vec<ToolCall> {
        let name = classification
            .tool
            .as_deref()
            .or_else(|| match_tool_trigger(&query.to_lowercase()));

        match name {
            Some(name) if catalog.get(name).is_some() => {
                vec![ToolCall::new(name, json!({ "query": query }))]
            }
            Some(name) => {
                warn!(tool = %name, "static selection named a tool absent from the catalog");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// Execute calls concurrently, isolating failures per tool.
    async fn execute_all(&self, calls: Vec<ToolCall>) -> HashMap<String, ToolResult> {
        let executions = calls.into_iter().map(|call| {
            let executor = Arc::clone(&self.executor);
            let timeout = self.tool_timeout;
            async move {
                let outcome =
                    tokio::time::timeout(timeout, executor.execute(&call.name, &call.arguments))
                        .await;
                let result = match outcome {
                    Ok(Ok(result)) => result,
                    Ok(Err(error)) => {
                        warn!(tool = %call.name, %error, "tool execution failed");
                        ToolResult::failure(error.to_string())
                    }
                    Err(_) => {
                        warn!(tool = %call.name, "tool execution timed out");
                        ToolResult::failure(format!(
                            "timed out after {}ms",
                            timeout.as_millis()
                        ))
                    }
                };
                (call.name, result)
            }
        });

        join_all(executions).await.into_iter().collect()
    }
}
