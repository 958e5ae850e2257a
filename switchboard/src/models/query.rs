//! The incoming query value type.

use serde::{Deserialize, Serialize};

/// An incoming natural-language question, together with whatever opaque
/// session context the caller wants carried along (recent turns, user
/// profile fragments, feature flags).
///
/// `Query` is an immutable value: it is created once per request and never
/// mutated. The core only reads `text`; `session_context` is passed through
/// to the AI classification tier verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Query {
    /// The raw question text as the user typed it.
    pub text: String,

    /// Opaque caller-supplied context. `Value::Null` when absent.
    #[serde(default)]
    pub session_context: serde_json::Value,
}

impl Query {
    /// Create a query with no session context.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            session_context: serde_json::Value::Null,
        }
    }

    /// Create a query carrying caller-supplied session context.
    pub fn with_context(text: impl Into<String>, session_context: serde_json::Value) -> Self {
        Self {
            text: text.into(),
            session_context,
        }
    }
}
