//! Tool invocation value types.

use serde::{Deserialize, Serialize};

/// A planned invocation of a named tool with structured arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Catalog name of the tool.
    pub name: String,

    /// Structured arguments, validated against the catalog's argument
    /// schema before execution.
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// The outcome of a single tool execution.
///
/// A failed tool produces a `ToolResult` with `success == false` rather than
/// an error: one tool's failure never cancels its siblings, and the caller
/// decides how to surface it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    /// Whether the tool ran to completion.
    pub success: bool,

    /// Human-readable summary, or the failure reason.
    pub message: String,

    /// Structured payload for successful executions.
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    /// A successful result with a payload.
    pub fn ok(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// A failure record. Used for execution errors and timeouts alike.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}
