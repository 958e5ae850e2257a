//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use std::path::Path;
use std::time::Duration;

use super::{Result, models::*, validation};

/// Builder for creating SwitchboardConfig instances.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: SwitchboardConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: SwitchboardConfig::default(),
        }
    }

    /// Create a builder pre-populated with the validated defaults.
    pub fn defaults() -> Self {
        Self::new()
    }

    /// Set the default number of fused results.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.config.search.top_k = top_k;
        self
    }

    /// Set the per-channel over-fetch factor.
    pub fn with_candidate_multiplier(mut self, multiplier: usize) -> Self {
        self.config.search.candidate_multiplier = multiplier;
        self
    }

    /// Set the weak-result escalation threshold.
    pub fn with_weak_score_threshold(mut self, threshold: f32) -> Self {
        self.config.search.weak_score_threshold = threshold;
        self
    }

    /// Set both channel timeouts at once.
    pub fn with_search_timeouts(mut self, lexical: Duration, semantic: Duration) -> Self {
        self.config.search.lexical_timeout = lexical;
        self.config.search.semantic_timeout = semantic;
        self
    }

    /// Set the rule-tier escalation threshold.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.config.classifier.confidence_threshold = threshold;
        self
    }

    /// Enable or disable the AI classification tier.
    pub fn with_ai_tier(mut self, enabled: bool) -> Self {
        self.config.classifier.ai_tier_enabled = enabled;
        self
    }

    /// Set the AI-tier classification timeout.
    pub fn with_ai_timeout(mut self, timeout: Duration) -> Self {
        self.config.classifier.ai_timeout = timeout;
        self
    }

    /// Set the planner and per-tool execution timeouts.
    pub fn with_tool_timeouts(mut self, planner: Duration, tool: Duration) -> Self {
        self.config.tools.planner_timeout = planner;
        self.config.tools.tool_timeout = tool;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log output format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Log to a file with a non-blocking writer.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<SwitchboardConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}
