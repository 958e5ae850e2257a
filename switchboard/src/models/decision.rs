//! Routing decisions produced by the query classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The downstream strategy a query should be handled with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Answer directly from tool invocations (calculations, status checks,
    /// live lookups). No document retrieval.
    ToolsOnly,

    /// Answer from indexed documentation via hybrid retrieval.
    Retrieval,

    /// Run tools and retrieval concurrently and let the caller interleave
    /// both into the final answer.
    Combined,

    /// Plain conversation (greetings, personal-memory recall). Neither
    /// tools nor retrieval are needed.
    Conversational,
}

impl Route {
    /// Map a loosely-spelled route name onto a [`Route`].
    ///
    /// The AI tier is prompted for the canonical snake_case names, but
    /// models routinely answer with the vocabulary of whatever system they
    /// were trained on. This accepts the spellings seen in practice.
    pub fn from_keyword(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "tools_only" | "mcp_tools_only" | "mcp_only" | "mcp" | "tools" => Some(Self::ToolsOnly),
            "retrieval" | "hybrid_search" | "documentation_only" | "documentation" | "docs" => {
                Some(Self::Retrieval)
            }
            "combined" | "hybrid" | "both" => Some(Self::Combined),
            "conversational" | "conversation" | "general" | "chat" => Some(Self::Conversational),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolsOnly => write!(f, "tools_only"),
            Self::Retrieval => write!(f, "retrieval"),
            Self::Combined => write!(f, "combined"),
            Self::Conversational => write!(f, "conversational"),
        }
    }
}

/// The classifier's verdict for a single query.
///
/// Produced exactly once per [`crate::models::Query`] and read-only
/// afterward. `confidence` is always a finite number in `[0, 1]`, including
/// on every fallback and error path, because downstream logic branches on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingDecision {
    /// Which downstream strategy should handle the query.
    pub route: Route,

    /// The specific tool the rule tier matched, when `route` involves tools
    /// and a single tool was unambiguous.
    pub tool: Option<String>,

    /// How certain the deciding tier was, in `[0, 1]`.
    pub confidence: f32,

    /// Short human-readable explanation of why this route was chosen.
    pub reasoning: String,

    /// A reformulated retrieval query, when the deciding tier produced one.
    /// Callers fall back to the raw query text when absent.
    pub search_query: Option<String>,
}

impl RoutingDecision {
    /// Create a decision. `confidence` is clamped into `[0, 1]` and NaN is
    /// coerced to zero so the invariant holds regardless of the source.
    pub fn new(route: Route, confidence: f32, reasoning: impl Into<String>) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            route,
            tool: None,
            confidence,
            reasoning: reasoning.into(),
            search_query: None,
        }
    }

    /// Attach the matched tool name.
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Attach a reformulated search query.
    pub fn with_search_query(mut self, search_query: impl Into<String>) -> Self {
        self.search_query = Some(search_query.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_keywords_accept_legacy_spellings() {
        assert_eq!(Route::from_keyword("MCP_TOOLS_ONLY"), Some(Route::ToolsOnly));
        assert_eq!(Route::from_keyword("HYBRID_SEARCH"), Some(Route::Retrieval));
        assert_eq!(Route::from_keyword("combined"), Some(Route::Combined));
        assert_eq!(Route::from_keyword(" Conversational "), Some(Route::Conversational));
        assert_eq!(Route::from_keyword("banana"), None);
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(RoutingDecision::new(Route::Retrieval, 1.7, "x").confidence, 1.0);
        assert_eq!(RoutingDecision::new(Route::Retrieval, -0.2, "x").confidence, 0.0);
        assert_eq!(RoutingDecision::new(Route::Retrieval, f32::NAN, "x").confidence, 0.0);
    }
}
