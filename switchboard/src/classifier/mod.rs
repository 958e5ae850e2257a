//! Two-tier query classification.
//!
//! Classification is a tiered strategy with an ordered fallback chain: a
//! cheap rule tier always produces a decision, and an expensive AI tier is
//! consulted only when the rule tier's confidence falls below the caller's
//! threshold. The [`FallbackClassifier`] composes the tiers and keeps the
//! highest-confidence decision; no tier is ever allowed to throw out of
//! this module, because the calling chat pipeline must always receive a
//! usable [`RoutingDecision`](crate::models::RoutingDecision).

mod ai;
mod fallback;
mod rules;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::models::RoutingDecision;

pub use ai::AiStrategy;
pub use fallback::FallbackClassifier;
pub use rules::RuleStrategy;

pub(crate) use rules::match_tool_trigger;

/// One tier of the classification chain.
#[async_trait]
pub trait ClassifierStrategy: Send + Sync + 'static + Debug {
    /// Attempt to classify `query`. `None` means this tier has no opinion
    /// (unavailable, timed out, or produced unusable output) — never an
    /// error.
    async fn classify(
        &self,
        query: &str,
        context: Option<&serde_json::Value>,
    ) -> Option<RoutingDecision>;
}
