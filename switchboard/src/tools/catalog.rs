//! The closed tool catalog and its argument schemas.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::ToolCall;
use crate::ports::ToolError;

/// Error type for catalog construction. Unlike everything else in this
/// module, a malformed catalog is a programmer error and propagates.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// Two specs share a name.
    #[error("duplicate tool name '{0}' in catalog")]
    DuplicateTool(String),

    /// A spec has an empty name.
    #[error("catalog contains a tool with an empty name")]
    EmptyName,
}

/// JSON type expected for an argument.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    String,
    Number,
    Boolean,
    Object,
}

impl ArgType {
    fn matches(self, value: &serde_json::Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
        }
    }
}

/// One declared argument of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgSpec {
    pub name: String,
    pub description: String,
    pub arg_type: ArgType,
    pub required: bool,
}

impl ArgSpec {
    pub fn required(name: &str, arg_type: ArgType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            arg_type,
            required: true,
        }
    }

    pub fn optional(name: &str, arg_type: ArgType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            arg_type,
            required: false,
        }
    }
}

/// A worked example shown to the planning model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExample {
    /// A query this tool answers.
    pub query: String,
    /// The arguments the tool should be called with for that query.
    pub arguments: serde_json::Value,
}

/// One tool variant: a name, an argument schema, and examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub args: Vec<ArgSpec>,
    pub examples: Vec<ToolExample>,
}

/// The closed set of tools a deployment exposes.
///
/// Dynamic stringly-typed dispatch is deliberately absent: a call is either
/// addressed to a declared variant with schema-conforming arguments, or it
/// is rejected before it reaches the execution port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCatalog {
    tools: Vec<ToolSpec>,
}

impl ToolCatalog {
    /// Build a catalog from specs, rejecting duplicates and empty names.
    pub fn new(tools: Vec<ToolSpec>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for spec in &tools {
            if spec.name.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if !seen.insert(spec.name.clone()) {
                return Err(CatalogError::DuplicateTool(spec.name.clone()));
            }
        }
        Ok(Self { tools })
    }

    /// The default support-domain tool set.
    pub fn support_defaults() -> Self {
        let tools = vec![
            ToolSpec {
                name: "calculator".to_string(),
                description: "Evaluate arithmetic: fees, percentages, pricing math".to_string(),
                args: vec![ArgSpec::required(
                    "expression",
                    ArgType::String,
                    "Arithmetic expression to evaluate",
                )],
                examples: vec![ToolExample {
                    query: "what is 2.9% of $100".to_string(),
                    arguments: json!({ "expression": "100 * 0.029" }),
                }],
            },
            ToolSpec {
                name: "currency_converter".to_string(),
                description: "Convert between currencies at current rates".to_string(),
                args: vec![
                    ArgSpec::required("amount", ArgType::Number, "Amount to convert"),
                    ArgSpec::required("from_currency", ArgType::String, "Source currency code"),
                    ArgSpec::required("to_currency", ArgType::String, "Target currency code"),
                ],
                examples: vec![ToolExample {
                    query: "convert 50 euros to usd".to_string(),
                    arguments: json!({ "amount": 50, "from_currency": "EUR", "to_currency": "USD" }),
                }],
            },
            ToolSpec {
                name: "status_checker".to_string(),
                description: "Check platform service status and outages".to_string(),
                args: vec![ArgSpec::optional(
                    "service",
                    ArgType::String,
                    "Specific service to check; omit for overall status",
                )],
                examples: vec![ToolExample {
                    query: "is the payments api down".to_string(),
                    arguments: json!({ "service": "payments" }),
                }],
            },
            ToolSpec {
                name: "web_search".to_string(),
                description: "Search the web for recent information not in the documentation"
                    .to_string(),
                args: vec![ArgSpec::required("query", ArgType::String, "Search query")],
                examples: vec![ToolExample {
                    query: "latest platform policy changes".to_string(),
                    arguments: json!({ "query": "platform policy changes this year" }),
                }],
            },
            ToolSpec {
                name: "code_validator".to_string(),
                description: "Validate code snippets and API endpoint usage".to_string(),
                args: vec![
                    ArgSpec::required("code", ArgType::String, "Code snippet to validate"),
                    ArgSpec::optional("language", ArgType::String, "Snippet language"),
                ],
                examples: vec![ToolExample {
                    query: "validate this webhook handler".to_string(),
                    arguments: json!({ "code": "app.post('/webhook', ...)", "language": "javascript" }),
                }],
            },
            ToolSpec {
                name: "datetime".to_string(),
                description: "Current date, time, and business-hours lookups".to_string(),
                args: vec![ArgSpec::optional(
                    "timezone",
                    ArgType::String,
                    "IANA timezone; defaults to UTC",
                )],
                examples: vec![ToolExample {
                    query: "what time is it in london".to_string(),
                    arguments: json!({ "timezone": "Europe/London" }),
                }],
            },
        ];

        Self::new(tools).expect("default catalog is well-formed")
    }

    /// Look up a spec by name.
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|spec| spec.name == name)
    }

    /// Iterate over declared tool names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|spec| spec.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate a planned call against the catalog: the tool must exist,
    /// required arguments must be present, and present arguments must have
    /// the declared type.
    pub fn validate_call(&self, call: &ToolCall) -> Result<(), ToolError> {
        let spec = self
            .get(&call.name)
            .ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;

        let arguments = match &call.arguments {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => {
                // Null stands in for "no arguments"; only valid when
                // nothing is required.
                return if spec.args.iter().any(|a| a.required) {
                    Err(ToolError::InvalidArguments {
                        tool: call.name.clone(),
                        reason: "arguments missing".to_string(),
                    })
                } else {
                    Ok(())
                };
            }
            _ => {
                return Err(ToolError::InvalidArguments {
                    tool: call.name.clone(),
                    reason: "arguments must be a JSON object".to_string(),
                });
            }
        };

        for arg in &spec.args {
            match arguments.get(&arg.name) {
                Some(value) => {
                    if !arg.arg_type.matches(value) {
                        return Err(ToolError::InvalidArguments {
                            tool: call.name.clone(),
                            reason: format!("argument '{}' has the wrong type", arg.name),
                        });
                    }
                }
                None if arg.required => {
                    return Err(ToolError::InvalidArguments {
                        tool: call.name.clone(),
                        reason: format!("required argument '{}' is missing", arg.name),
                    });
                }
                None => {}
            }
        }

        Ok(())
    }

    /// Render the catalog as the machine-readable block embedded in the
    /// planning prompt.
    pub fn prompt_block(&self) -> String {
        let mut block = String::new();
        for spec in &self.tools {
            block.push_str(&format!("- {}: {}\n", spec.name, spec.description));
            for arg in &spec.args {
                block.push_str(&format!(
                    "    {} ({:?}{}): {}\n",
                    arg.name,
                    arg.arg_type,
                    if arg.required { ", required" } else { "" },
                    arg.description
                ));
            }
            for example in &spec.examples {
                block.push_str(&format!(
                    "    example: \"{}\" -> {}\n",
                    example.query, example.arguments
                ));
            }
        }
        block
    }
}
