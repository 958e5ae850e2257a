//! Integration tests for the router facade: branch dispatch, combined
//! concurrency, weak-result escalation, and lifecycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use switchboard::config::ConfigBuilder;
use switchboard::models::{IndexHit, Query, Route, ToolResult};
use switchboard::ports::{
    LanguageModelPort, LexicalSearchPort, ModelError, SearchError, SemanticSearchPort, ToolError,
    ToolExecutionPort,
};
use switchboard::router::QueryRouter;

#[derive(Debug)]
struct StaticLexical {
    hits: Vec<IndexHit>,
    fail: bool,
}

#[async_trait]
impl LexicalSearchPort for StaticLexical {
    async fn search(
        &self,
        _text: &str,
        top_k: usize,
        _filters: Option<&serde_json::Value>,
    ) -> Result<Vec<IndexHit>, SearchError> {
        if self.fail {
            return Err(SearchError::Unavailable("offline".into()));
        }
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }
}

#[derive(Debug)]
struct StaticSemantic {
    hits: Vec<IndexHit>,
    fail: bool,
}

#[async_trait]
impl SemanticSearchPort for StaticSemantic {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, SearchError> {
        if self.fail {
            return Err(SearchError::Embedding("offline".into()));
        }
        Ok(vec![0.0; 3])
    }

    async fn search(&self, _vector: &[f32], top_k: usize) -> Result<Vec<IndexHit>, SearchError> {
        if self.fail {
            return Err(SearchError::Unavailable("offline".into()));
        }
        Ok(self.hits.iter().take(top_k).cloned().collect())
    }
}

/// Routes classifier prompts and planner prompts to different canned
/// answers, like a real model would see two different instructions.
#[derive(Debug)]
struct SplitModel {
    classification: String,
    plan: String,
}

#[async_trait]
impl LanguageModelPort for SplitModel {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        if prompt.contains("tool planner") {
            Ok(self.plan.clone())
        } else {
            Ok(self.classification.clone())
        }
    }
}

#[derive(Debug, Default)]
struct FlagExecutor {
    closed: AtomicBool,
}

#[async_trait]
impl ToolExecutionPort for FlagExecutor {
    async fn execute(
        &self,
        name: &str,
        _arguments: &serde_json::Value,
    ) -> Result<ToolResult, ToolError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ToolError::Closed);
        }
        Ok(ToolResult::ok(format!("{name} ran"), None))
    }

    async fn close(&self) -> Result<(), ToolError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn hit(id: &str, score: f32) -> IndexHit {
    IndexHit::new(id, format!("content {id}"), score)
}

fn hits() -> Vec<IndexHit> {
    vec![hit("doc-1", 4.0), hit("doc-2", 2.0), hit("doc-3", 1.0)]
}

#[tokio::test]
async fn conversational_queries_touch_neither_subsystem() {
    let router = QueryRouter::builder()
        .with_lexical(Arc::new(StaticLexical { hits: hits(), fail: false }))
        .with_semantic(Arc::new(StaticSemantic { hits: hits(), fail: false }))
        .with_tools(Arc::new(FlagExecutor::default()))
        .build()
        .expect("router builds");

    let response = router.route(&Query::new("hello there!"), None).await;
    assert_eq!(response.decision.route, Route::Conversational);
    assert!(response.results.is_empty());
    assert!(response.tool_results.is_empty());
    assert!(response.retrieval_available);
}

#[tokio::test]
async fn tools_only_queries_run_the_selector() {
    let router = QueryRouter::builder()
        .with_lexical(Arc::new(StaticLexical { hits: hits(), fail: false }))
        .with_semantic(Arc::new(StaticSemantic { hits: hits(), fail: false }))
        .with_tools(Arc::new(FlagExecutor::default()))
        .build()
        .expect("router builds");

    // No model injected: the rule tier routes this to tools and the
    // selector takes the static path.
    let response = router
        .route(&Query::new("is the payments api down"), None)
        .await;

    assert_eq!(response.decision.route, Route::ToolsOnly);
    assert!(response.results.is_empty());
    assert!(response.tool_results["status_checker"].success);
}

#[tokio::test]
async fn combined_decisions_return_both_signals() {
    let model = SplitModel {
        classification:
            r#"{"route": "combined", "confidence": 0.9, "reasoning": "needs live data and docs"}"#
                .to_string(),
        plan: r#"{"tools": [{"name": "web_search", "arguments": {"query": "platform changes"}}]}"#
            .to_string(),
    };

    let router = QueryRouter::builder()
        .with_lexical(Arc::new(StaticLexical { hits: hits(), fail: false }))
        .with_semantic(Arc::new(StaticSemantic { hits: hits(), fail: false }))
        .with_model(Arc::new(model))
        .with_tools(Arc::new(FlagExecutor::default()))
        .build()
        .expect("router builds");

    let response = router
        .route(&Query::new("quarterly flamingo revenue"), None)
        .await;

    assert_eq!(response.decision.route, Route::Combined);
    assert!(!response.results.is_empty());
    assert!(response.tool_results["web_search"].success);
    assert!(!response.escalated);
}

#[tokio::test]
async fn weak_retrieval_escalates_to_tools() {
    // A single lexical hit normalizes to the degenerate 0.5, giving a top
    // fused score of 0.15; the threshold below is set above that.
    let config = ConfigBuilder::new()
        .with_weak_score_threshold(0.2)
        .build()
        .expect("valid config");

    let router = QueryRouter::builder()
        .with_config(config)
        .with_lexical(Arc::new(StaticLexical { hits: vec![hit("only", 1.0)], fail: false }))
        .with_semantic(Arc::new(StaticSemantic { hits: Vec::new(), fail: false }))
        .with_tools(Arc::new(FlagExecutor::default()))
        .build()
        .expect("router builds");

    let response = router
        .route(&Query::new("how do I set up webhooks"), None)
        .await;

    assert_eq!(response.decision.route, Route::Retrieval);
    assert!(response.escalated);
    assert_eq!(response.results.len(), 1);
}

#[tokio::test]
async fn strong_retrieval_does_not_escalate() {
    let router = QueryRouter::builder()
        .with_lexical(Arc::new(StaticLexical { hits: hits(), fail: false }))
        .with_semantic(Arc::new(StaticSemantic { hits: hits(), fail: false }))
        .with_tools(Arc::new(FlagExecutor::default()))
        .build()
        .expect("router builds");

    let response = router
        .route(&Query::new("how do I set up webhooks"), None)
        .await;

    assert_eq!(response.decision.route, Route::Retrieval);
    assert!(!response.escalated);
    assert!(response.tool_results.is_empty());
}

#[tokio::test]
async fn total_retrieval_loss_is_flagged_not_masked() {
    let router = QueryRouter::builder()
        .with_lexical(Arc::new(StaticLexical { hits: Vec::new(), fail: true }))
        .with_semantic(Arc::new(StaticSemantic { hits: Vec::new(), fail: true }))
        .with_tools(Arc::new(FlagExecutor::default()))
        .build()
        .expect("router builds");

    let response = router
        .route(&Query::new("how do I set up webhooks"), None)
        .await;

    assert!(!response.retrieval_available);
    assert!(response.results.is_empty());
}

#[tokio::test]
async fn session_context_reaches_the_ai_tier() {
    let model = SplitModel {
        classification: r#"{"route": "retrieval", "confidence": 0.9}"#.to_string(),
        plan: r#"{"tools": []}"#.to_string(),
    };

    let router = QueryRouter::builder()
        .with_lexical(Arc::new(StaticLexical { hits: hits(), fail: false }))
        .with_semantic(Arc::new(StaticSemantic { hits: hits(), fail: false }))
        .with_model(Arc::new(model))
        .with_tools(Arc::new(FlagExecutor::default()))
        .build()
        .expect("router builds");

    let query = Query::with_context(
        "quarterly flamingo revenue",
        json!({ "plan": "enterprise" }),
    );
    let response = router.route(&query, None).await;
    assert_eq!(response.decision.route, Route::Retrieval);
}

#[tokio::test]
async fn shutdown_closes_the_tool_channel() {
    let executor = Arc::new(FlagExecutor::default());
    let router = QueryRouter::builder()
        .with_lexical(Arc::new(StaticLexical { hits: hits(), fail: false }))
        .with_semantic(Arc::new(StaticSemantic { hits: hits(), fail: false }))
        .with_tools(Arc::clone(&executor) as Arc<dyn ToolExecutionPort>)
        .build()
        .expect("router builds");

    router.shutdown().await.expect("close succeeds");
    assert!(executor.closed.load(Ordering::SeqCst));

    // The channel is really closed: further executions fail.
    let result = executor.execute("web_search", &json!({})).await;
    assert!(matches!(result, Err(ToolError::Closed)));
}
