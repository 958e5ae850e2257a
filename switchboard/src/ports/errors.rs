//! Error types for port operations.

/// Error type for lexical and semantic index operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The index rejected or failed the query.
    #[error("index query failed: {0}")]
    Query(String),

    /// Embedding the query text failed (semantic channel only).
    #[error("query embedding failed: {0}")]
    Embedding(String),

    /// The backing store is unreachable.
    #[error("search backend unavailable: {0}")]
    Unavailable(String),

    /// The call exceeded its configured time budget. Produced by the
    /// engine, not by port implementations.
    #[error("search call timed out after {0}ms")]
    Timeout(u64),
}

/// Error type for language-model generation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// The model call failed (network, quota, refusal, ...).
    #[error("generation failed: {0}")]
    Generation(String),

    /// No model is configured or the provider is unreachable.
    #[error("language model unavailable: {0}")]
    Unavailable(String),

    /// The call exceeded its configured time budget.
    #[error("generation timed out after {0}ms")]
    Timeout(u64),
}

/// Error type for tool execution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ToolError {
    /// The tool name is not present in the catalog.
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    /// The arguments failed catalog validation.
    #[error("invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments {
        /// Catalog name of the tool.
        tool: String,
        /// What the validator objected to.
        reason: String,
    },

    /// The tool ran and failed.
    #[error("tool execution failed: {0}")]
    Execution(String),

    /// The execution channel has been closed.
    #[error("tool execution channel is closed")]
    Closed,

    /// The call exceeded its configured time budget.
    #[error("tool execution timed out after {0}ms")]
    Timeout(u64),
}
