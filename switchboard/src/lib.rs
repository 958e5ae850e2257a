//! # Switchboard
//!
//! Hybrid retrieval and query routing core for support assistants: decides
//! how an incoming natural-language question should be answered (direct
//! tool invocation, document retrieval, both, or plain conversation) and,
//! when retrieval is required, fuses a lexical full-text search with a
//! dense vector search into a single ranked, recency-adjusted result list.
//!
//! Switchboard is a library boundary, not a service. It does no I/O of its
//! own: the full-text index, the vector index, the tool channel, and the
//! language model are all injected behind [`ports`] traits, and the
//! surrounding application (HTTP handlers, session storage, prompt
//! assembly) calls in through [`router::QueryRouter`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use switchboard::prelude::*;
//!
//! # async fn example(
//! #     lexical: Arc<dyn LexicalSearchPort>,
//! #     semantic: Arc<dyn SemanticSearchPort>,
//! #     model: Arc<dyn LanguageModelPort>,
//! #     tools: Arc<dyn ToolExecutionPort>,
//! # ) -> switchboard::Result<()> {
//! let router = QueryRouter::builder()
//!     .with_lexical(lexical)
//!     .with_semantic(semantic)
//!     .with_model(model)
//!     .with_tools(tools)
//!     .build()?;
//!
//! let response = router.route(&Query::new("how do I set up webhooks?"), None).await;
//! for result in &response.results {
//!     println!("{} ({:.3})", result.id, result.final_score);
//! }
//!
//! router.shutdown().await.ok();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Classification** ([`classifier`]): a cheap rule tier always answers;
//!   an AI tier is consulted only below a confidence threshold and can
//!   never fail the call.
//! - **Retrieval** ([`search`]): both index channels run concurrently,
//!   scores are min-max normalized per channel, fused with query-dependent
//!   weights, recency-adjusted, and re-ranked.
//! - **Tools** ([`tools`]): an AI planner proposes calls against a closed,
//!   typed catalog; validation is central and the fallback path is
//!   deterministic.

pub mod classifier;
pub mod config;
pub mod logging;
pub mod models;
pub mod ports;
pub mod router;
pub mod search;
pub mod tools;

mod util;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::config::{ConfigBuilder, ConfigLoader, SwitchboardConfig};
    pub use crate::models::{
        IndexHit, Query, Route, RoutingDecision, SearchResult, ToolCall, ToolResult,
    };
    pub use crate::ports::{
        LanguageModelPort, LexicalSearchPort, SemanticSearchPort, ToolExecutionPort,
    };
    pub use crate::router::{QueryRouter, RoutedResponse};
    pub use crate::search::{HybridSearchEngine, RetrievalError};
    pub use crate::tools::{ToolCatalog, ToolSelector};
    pub use crate::{Result, SwitchboardError};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Switchboard operations.
///
/// Recoverable conditions (a failed retrieval channel, an unresponsive
/// model, a failed tool) never surface here — they are handled inside the
/// components per their degradation contracts. This type covers
/// construction and configuration problems plus total retrieval loss.
#[derive(Debug, thiserror::Error)]
pub enum SwitchboardError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),

    /// Malformed tool catalog (programmer error)
    #[error("Catalog error: {0}")]
    Catalog(#[from] tools::CatalogError),

    /// Both retrieval channels failed
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] search::RetrievalError),

    /// Other unclassified errors
    #[error("{0}")]
    Other(String),
}

impl From<config::ConfigError> for SwitchboardError {
    fn from(err: config::ConfigError) -> Self {
        SwitchboardError::Configuration(err.to_string())
    }
}

/// Result type for Switchboard operations
pub type Result<T> = std::result::Result<T, SwitchboardError>;
