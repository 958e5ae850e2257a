//! The `QueryRouter` facade: classification, retrieval, and tool execution
//! behind one dependency-injected entry point.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::classifier::{AiStrategy, FallbackClassifier, RuleStrategy};
use crate::config::SwitchboardConfig;
use crate::models::{Query, Route, RoutingDecision, SearchResult, ToolResult};
use crate::ports::{
    LanguageModelPort, LexicalSearchPort, SemanticSearchPort, ToolError, ToolExecutionPort,
};
use crate::search::{HybridSearchEngine, RetrievalError};
use crate::tools::{ToolCatalog, ToolPlanner, ToolSelector};
use crate::{Result, SwitchboardError};

/// Everything the caller needs to compose an answer for one query.
#[derive(Debug, Clone, Serialize)]
pub struct RoutedResponse {
    /// Request id carried on every log line for this query.
    pub request_id: Uuid,

    /// The classifier's verdict.
    pub decision: RoutingDecision,

    /// Fused retrieval results; empty when the route needed none or the
    /// retrieval subsystem was unavailable.
    pub results: Vec<SearchResult>,

    /// Tool outputs keyed by tool name; empty when the route needed none.
    pub tool_results: HashMap<String, ToolResult>,

    /// False when both retrieval channels were down. Lets callers
    /// distinguish "no matches" from "search subsystem down".
    pub retrieval_available: bool,

    /// True when a retrieval-only decision came back weak and tools were
    /// run as a fallback on top of it.
    pub escalated: bool,
}

/// The routing core's public entry point.
///
/// Owns the injected ports and configuration; holds no per-request state.
/// Construction wires the tiered classifier, the hybrid engine, and the
/// tool selector from the same pool of ports, so the embedding application
/// manages exactly four resources and their lifecycle.
#[derive(Debug)]
pub struct QueryRouter {
    config: SwitchboardConfig,
    engine: HybridSearchEngine,
    classifier: FallbackClassifier,
    selector: ToolSelector,
    catalog: ToolCatalog,
    tools_port: Arc<dyn ToolExecutionPort>,
}

impl QueryRouter {
    /// Start building a router.
    pub fn builder() -> QueryRouterBuilder {
        QueryRouterBuilder::new()
    }

    /// The catalog this router plans against.
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Classify a query.
    ///
    /// `confidence_threshold` overrides the configured rule-tier escalation
    /// threshold for this call. Always returns a usable decision; AI-tier
    /// trouble degrades to the rule tier.
    pub async fn classify(
        &self,
        query_text: &str,
        confidence_threshold: Option<f32>,
        context: Option<&serde_json::Value>,
    ) -> RoutingDecision {
        let threshold =
            confidence_threshold.unwrap_or(self.config.classifier.confidence_threshold);
        self.classifier.classify(query_text, threshold, context).await
    }

    /// Run a hybrid search and return the fused top results.
    pub async fn hybrid_search(
        &self,
        query_text: &str,
        top_k: Option<usize>,
    ) -> std::result::Result<Vec<SearchResult>, RetrievalError> {
        let top_k = top_k.unwrap_or(self.config.search.top_k);
        self.engine.search(query_text, top_k).await
    }

    /// Select and execute tools for a query against a caller-supplied
    /// catalog. Returns per-tool results keyed by name; never fails.
    pub async fn select_and_execute_tools(
        &self,
        query_text: &str,
        catalog: &ToolCatalog,
        classification: &RoutingDecision,
        recent_history: &[String],
    ) -> HashMap<String, ToolResult> {
        self.selector
            .select_and_execute(query_text, catalog, classification, recent_history)
            .await
    }

    /// Classify and fully dispatch one query.
    ///
    /// `Combined` runs retrieval and tools concurrently. A `Retrieval`
    /// decision whose fused top score falls below the configured
    /// weak-result threshold is escalated: tools run as a fallback and the
    /// response carries both signals.
    pub async fn route(&self, query: &Query, top_k: Option<usize>) -> RoutedResponse {
        let request_id = Uuid::new_v4();
        let span = info_span!("route", %request_id);
        self.route_inner(query, top_k, request_id).instrument(span).await
    }

    async fn route_inner(
        &self,
        query: &Query,
        top_k: Option<usize>,
        request_id: Uuid,
    ) -> RoutedResponse {
        let context = match &query.session_context {
            serde_json::Value::Null => None,
            other => Some(other),
        };
        let decision = self.classify(&query.text, None, context).await;
        info!(route = %decision.route, confidence = decision.confidence, "dispatching query");

        let search_query = decision.search_query.as_deref().unwrap_or(&query.text);
        let history: Vec<String> = Vec::new();

        let mut response = RoutedResponse {
            request_id,
            decision: decision.clone(),
            results: Vec::new(),
            tool_results: HashMap::new(),
            retrieval_available: true,
            escalated: false,
        };

        match decision.route {
            Route::Conversational => {}
            Route::ToolsOnly => {
                response.tool_results = self
                    .select_and_execute_tools(&query.text, &self.catalog, &decision, &history)
                    .await;
            }
            Route::Retrieval => {
                match self.hybrid_search(search_query, top_k).await {
                    Ok(results) => {
                        let weak = results
                            .first()
                            .is_none_or(|top| {
                                top.final_score < self.config.search.weak_score_threshold
                            });
                        response.results = results;
                        if weak {
                            // Weak documentation signal: fall through to
                            // tools (typically web search) on top of it.
                            info!("retrieval signal weak; escalating to combined");
                            response.escalated = true;
                            response.tool_results = self
                                .select_and_execute_tools(
                                    &query.text,
                                    &self.catalog,
                                    &decision,
                                    &history,
                                )
                                .await;
                        }
                    }
                    Err(error) => {
                        warn!(%error, "retrieval unavailable");
                        response.retrieval_available = false;
                    }
                }
            }
            Route::Combined => {
                let (search_outcome, tool_results) = tokio::join!(
                    self.hybrid_search(search_query, top_k),
                    self.select_and_execute_tools(&query.text, &self.catalog, &decision, &history),
                );
                response.tool_results = tool_results;
                match search_outcome {
                    Ok(results) => response.results = results,
                    Err(error) => {
                        warn!(%error, "retrieval unavailable");
                        response.retrieval_available = false;
                    }
                }
            }
        }

        response
    }

    /// Close the tool execution channel. Call once on application
    /// shutdown.
    pub async fn shutdown(&self) -> std::result::Result<(), ToolError> {
        self.tools_port.close().await
    }
}

/// Builder wiring ports and configuration into a [`QueryRouter`].
#[derive(Debug, Default)]
pub struct QueryRouterBuilder {
    config: Option<SwitchboardConfig>,
    lexical: Option<Arc<dyn LexicalSearchPort>>,
    semantic: Option<Arc<dyn SemanticSearchPort>>,
    model: Option<Arc<dyn LanguageModelPort>>,
    tools: Option<Arc<dyn ToolExecutionPort>>,
    catalog: Option<ToolCatalog>,
}

impl QueryRouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit configuration instead of the defaults.
    pub fn with_config(mut self, config: SwitchboardConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Inject the full-text index port. Required.
    pub fn with_lexical(mut self, port: Arc<dyn LexicalSearchPort>) -> Self {
        self.lexical = Some(port);
        self
    }

    /// Inject the vector index port. Required.
    pub fn with_semantic(mut self, port: Arc<dyn SemanticSearchPort>) -> Self {
        self.semantic = Some(port);
        self
    }

    /// Inject the language model port. Optional: without it the AI
    /// classification tier and the tool planner are skipped and only the
    /// deterministic paths run.
    pub fn with_model(mut self, port: Arc<dyn LanguageModelPort>) -> Self {
        self.model = Some(port);
        self
    }

    /// Inject the tool execution port. Required.
    pub fn with_tools(mut self, port: Arc<dyn ToolExecutionPort>) -> Self {
        self.tools = Some(port);
        self
    }

    /// Use a custom tool catalog instead of the support defaults.
    pub fn with_catalog(mut self, catalog: ToolCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Wire everything into a router.
    pub fn build(self) -> Result<QueryRouter> {
        let config = self.config.unwrap_or_default();
        let catalog = self.catalog.unwrap_or_else(ToolCatalog::support_defaults);

        let lexical = self
            .lexical
            .ok_or_else(|| SwitchboardError::Configuration("lexical port is required".into()))?;
        let semantic = self
            .semantic
            .ok_or_else(|| SwitchboardError::Configuration("semantic port is required".into()))?;
        let tools_port = self
            .tools
            .ok_or_else(|| SwitchboardError::Configuration("tool port is required".into()))?;

        let engine = HybridSearchEngine::new(lexical, semantic, &config.search);

        let mut classifier =
            FallbackClassifier::new().with_tier(Box::new(RuleStrategy::new()));
        if config.classifier.ai_tier_enabled
            && let Some(model) = &self.model
        {
            let ai = AiStrategy::new(Arc::clone(model), config.classifier.ai_timeout)
                .with_tool_names(catalog.names().map(String::from).collect());
            classifier = classifier.with_tier(Box::new(ai));
        }

        let selector = match &self.model {
            Some(model) => ToolSelector::new(
                ToolPlanner::new(Arc::clone(model), config.tools.planner_timeout),
                Arc::clone(&tools_port),
                config.tools.tool_timeout,
            ),
            None => ToolSelector::static_only(Arc::clone(&tools_port), config.tools.tool_timeout),
        };

        Ok(QueryRouter {
            config,
            engine,
            classifier,
            selector,
            catalog,
            tools_port,
        })
    }
}
