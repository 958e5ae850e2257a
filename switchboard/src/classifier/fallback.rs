//! Tier composition: try strategies in order, keep the best decision.

use tracing::debug;

use crate::classifier::ClassifierStrategy;
use crate::models::{Route, RoutingDecision};

/// Composes classification tiers into an ordered fallback chain.
///
/// Tiers are consulted in registration order. Once a decision meets the
/// caller's confidence threshold, later (more expensive) tiers are not
/// consulted; otherwise every tier gets a chance and the highest-confidence
/// decision wins, with earlier tiers winning ties. A tier that returns
/// `None` is simply skipped, so an unavailable AI tier degrades to the
/// rule tier's answer.
///
/// `classify` always returns a decision: if every tier abstains (which
/// cannot happen with a rule tier registered, but the chain is generic),
/// a conservative retrieval default is returned.
#[derive(Debug, Default)]
pub struct FallbackClassifier {
    tiers: Vec<Box<dyn ClassifierStrategy>>,
}

impl FallbackClassifier {
    pub fn new() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Append a tier to the chain. Order matters: cheap tiers first.
    pub fn with_tier(mut self, tier: Box<dyn ClassifierStrategy>) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Classify a query, escalating through tiers while confidence stays
    /// below `threshold`.
    pub async fn classify(
        &self,
        query: &str,
        threshold: f32,
        context: Option<&serde_json::Value>,
    ) -> RoutingDecision {
        let mut best: Option<RoutingDecision> = None;

        for tier in &self.tiers {
            if let Some(decision) = tier.classify(query, context).await {
                let improves = best
                    .as_ref()
                    .is_none_or(|current| decision.confidence > current.confidence);
                if improves {
                    best = Some(decision);
                }
            }

            if best
                .as_ref()
                .is_some_and(|decision| decision.confidence >= threshold)
            {
                break;
            }
        }

        let decision = best.unwrap_or_else(|| {
            RoutingDecision::new(
                Route::Retrieval,
                0.5,
                "classification unavailable, defaulting to retrieval",
            )
        });

        debug!(
            route = %decision.route,
            confidence = decision.confidence,
            "classification complete"
        );
        decision
    }
}
