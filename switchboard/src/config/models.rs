//! Configuration model definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure for Switchboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SwitchboardConfig {
    /// Hybrid search configuration
    pub search: SearchConfig,

    /// Query classification configuration
    pub classifier: ClassifierConfig,

    /// Tool selection and execution configuration
    pub tools: ToolsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Configuration for the hybrid search engine and fusion stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of fused results returned when the caller does not override it.
    pub top_k: usize,

    /// Over-fetch factor: each channel is asked for `top_k *
    /// candidate_multiplier` candidates so fusion has overlap to work with.
    pub candidate_multiplier: usize,

    /// Fused top score below which a retrieval-only decision is escalated
    /// to the combined path. Empirically chosen (observed useful range
    /// 0.05–0.15); a tunable, not an invariant.
    pub weak_score_threshold: f32,

    /// Time budget for one lexical index call.
    #[serde(with = "humantime_serde")]
    pub lexical_timeout: Duration,

    /// Time budget for embedding plus vector lookup combined.
    #[serde(with = "humantime_serde")]
    pub semantic_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            candidate_multiplier: 2,
            weak_score_threshold: 0.10,
            lexical_timeout: Duration::from_secs(2),
            semantic_timeout: Duration::from_secs(3),
        }
    }
}

impl SearchConfig {
    /// Validate the configuration, returning an error if invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        if self.candidate_multiplier == 0 {
            return Err("candidate_multiplier must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.weak_score_threshold) {
            return Err("weak_score_threshold must be within [0, 1]".to_string());
        }
        if self.lexical_timeout.is_zero() || self.semantic_timeout.is_zero() {
            return Err("search timeouts must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Configuration for the two-tier query classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Rule-tier confidence below which the AI tier is consulted.
    pub confidence_threshold: f32,

    /// Whether the AI tier is consulted at all. With this off (or no model
    /// port injected) classification is purely rule-based.
    pub ai_tier_enabled: bool,

    /// Time budget for one AI-tier classification call. The rule-tier
    /// result must never be blocked by an unresponsive model.
    #[serde(with = "humantime_serde")]
    pub ai_timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            ai_tier_enabled: true,
            ai_timeout: Duration::from_secs(4),
        }
    }
}

impl ClassifierConfig {
    /// Validate the configuration, returning an error if invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err("confidence_threshold must be within [0, 1]".to_string());
        }
        if self.ai_timeout.is_zero() {
            return Err("ai_timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Configuration for tool planning and execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Time budget for the AI plan stage.
    #[serde(with = "humantime_serde")]
    pub planner_timeout: Duration,

    /// Time budget for each individual tool execution.
    #[serde(with = "humantime_serde")]
    pub tool_timeout: Duration,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            planner_timeout: Duration::from_secs(4),
            tool_timeout: Duration::from_secs(5),
        }
    }
}

impl ToolsConfig {
    /// Validate the configuration, returning an error if invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.planner_timeout.is_zero() || self.tool_timeout.is_zero() {
            return Err("tool timeouts must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Log verbosity levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// Machine-readable JSON lines
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level to emit
    pub level: LogLevel,

    /// Output format
    pub format: LogFormat,

    /// Whether to log to stdout
    pub stdout: bool,

    /// Optional log file path; uses a non-blocking writer when set
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            stdout: true,
            file: None,
        }
    }
}
