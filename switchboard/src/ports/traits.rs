//! Trait definitions for the external collaborators of the routing core.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::models::{IndexHit, ToolResult};
use crate::ports::errors::{ModelError, SearchError, ToolError};

/// Abstract interface to a full-text (term-frequency/BM25-style) index.
#[async_trait]
pub trait LexicalSearchPort: Send + Sync + 'static + Debug {
    /// Query the index and return up to `top_k` scored hits, best first.
    ///
    /// `filters` is an opaque, backend-specific filter expression; `None`
    /// searches the whole index.
    async fn search(
        &self,
        text: &str,
        top_k: usize,
        filters: Option<&serde_json::Value>,
    ) -> Result<Vec<IndexHit>, SearchError>;
}

/// Abstract interface to a dense vector index.
#[async_trait]
pub trait SemanticSearchPort: Send + Sync + 'static + Debug {
    /// Embed query text into the index's vector space.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SearchError>;

    /// Query the index with an embedding and return up to `top_k` scored
    /// hits, best first.
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<IndexHit>, SearchError>;
}

/// Abstract interface to the tool execution channel.
///
/// The channel is an explicitly owned resource: it is opened once by the
/// embedding application, injected into the router, and closed through
/// [`ToolExecutionPort::close`] on shutdown.
#[async_trait]
pub trait ToolExecutionPort: Send + Sync + 'static + Debug {
    /// Execute a named tool with validated arguments.
    async fn execute(
        &self,
        name: &str,
        arguments: &serde_json::Value,
    ) -> Result<ToolResult, ToolError>;

    /// Release the channel. Subsequent `execute` calls should fail with
    /// [`ToolError::Closed`].
    async fn close(&self) -> Result<(), ToolError>;
}

/// Abstract interface to a text-generation model.
///
/// Used by both the AI classification tier and the tool planner. The core
/// only ever sends one prompt and reads one completion; conversation state
/// management belongs to the caller.
#[async_trait]
pub trait LanguageModelPort: Send + Sync + 'static + Debug {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}
