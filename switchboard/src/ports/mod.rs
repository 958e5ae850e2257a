//! Collaborator contracts.
//!
//! The routing core does no I/O of its own: full-text search, vector
//! search, tool execution, and language-model generation all live behind
//! the `async_trait` ports defined here. Implementations are provided by
//! the embedding application and injected into
//! [`crate::router::QueryRouter`] at construction time.
//!
//! Every call across a port boundary is a suspension point; the core holds
//! no lock and no mutable shared state across any of them.

mod errors;
mod traits;

pub use errors::{ModelError, SearchError, ToolError};
pub use traits::{LanguageModelPort, LexicalSearchPort, SemanticSearchPort, ToolExecutionPort};
