//! Rule-tier classification: ordered pattern families with fixed
//! confidences.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use crate::classifier::ClassifierStrategy;
use crate::models::{Route, RoutingDecision};

/// Phrases that recall personal details from the conversation. The most
/// unambiguous family, hence the highest fixed confidence.
const MEMORY_RECALL_PHRASES: &[&str] = &[
    "my name",
    "what is my",
    "who am i",
    "do you know me",
    "remember me",
    "what did i say",
    "what did we talk",
    "our conversation",
    "earlier i",
    "i told you",
];

/// How-to and documentation vocabulary.
const HOWTO_PHRASES: &[&str] = &[
    "how to",
    "how do i",
    "how does",
    "guide",
    "tutorial",
    "documentation",
    "explain",
    "what is",
    "where can i find",
    "set up",
    "implement",
    "integrate",
    "configure",
];

lazy_static! {
    static ref GREETING: Regex = Regex::new(
        r"(?i)^(hi|hello|hey|greetings|howdy|good morning|good afternoon|good evening|how are you|how's it going|what's up|sup)\b"
    )
    .expect("greeting regex");

    static ref GENERAL_HELP: Regex = Regex::new(
        r"(?i)^(help|can you help|i need help|assist me|what can you do|how does this work|tell me about yourself)\b"
    )
    .expect("general help regex");

    static ref CALCULATION: Regex =
        Regex::new(r"(?i)\b(fee|fees|cost|price|pricing|calculate|math|percent|percentage)\b")
            .expect("calculation regex");

    static ref CURRENCY: Regex =
        Regex::new(r"(?i)\b(convert|conversion|exchange rate)\b").expect("currency regex");

    static ref STATUS: Regex = Regex::new(
        r"(?i)\b(down|status|operational|outage|not working|disruption)\b"
    )
    .expect("status regex");

    static ref CODE_VALIDATION: Regex = Regex::new(
        r"(?i)\b(validate|verify)\b.*\b(code|endpoint|webhook|signature|snippet)\b"
    )
    .expect("code validation regex");

    static ref DATETIME: Regex = Regex::new(
        r"(?i)\b(what time|current time|what date|today's date|business hours)\b"
    )
    .expect("datetime regex");

    static ref FRESHNESS: Regex = Regex::new(
        r"(?i)\b(latest|recent|news|breaking|what's new|newest)\b"
    )
    .expect("freshness regex");

    static ref HAS_DIGIT: Regex = Regex::new(r"\d").expect("digit regex");
}

/// Match the tool-trigger families against a query.
///
/// The calculation and conversion families require a numeric token in the
/// query: "how are fees calculated" is a documentation question, "2.9% fee
/// on $100" is a calculator invocation. Shared with the tool selector's
/// static fallback path.
pub(crate) fn match_tool_trigger(query: &str) -> Option<&'static str> {
    let has_digit = HAS_DIGIT.is_match(query);

    if CURRENCY.is_match(query) && has_digit {
        return Some("currency_converter");
    }
    if CALCULATION.is_match(query) && has_digit {
        return Some("calculator");
    }
    if STATUS.is_match(query) {
        return Some("status_checker");
    }
    if CODE_VALIDATION.is_match(query) {
        return Some("code_validator");
    }
    if DATETIME.is_match(query) {
        return Some("datetime");
    }
    if FRESHNESS.is_match(query) {
        return Some("web_search");
    }

    None
}

/// The rule tier: an ordered list of pattern families, first match wins.
///
/// Fixed confidences reflect how unambiguous each family is: explicit
/// memory-recall phrasing is nearly certain (0.95), down to 0.30 when no
/// pattern matched at all. Pure and deterministic: the same query text
/// always yields the same decision.
#[derive(Debug, Clone, Default)]
pub struct RuleStrategy;

impl RuleStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Classify a query. Always produces a decision.
    pub fn classify(&self, query: &str) -> RoutingDecision {
        let q = query.trim().to_lowercase();

        if MEMORY_RECALL_PHRASES.iter().any(|p| q.contains(p)) {
            return RoutingDecision::new(
                Route::Conversational,
                0.95,
                "query recalls personal details from the conversation",
            );
        }

        if GREETING.is_match(&q) || GENERAL_HELP.is_match(&q) {
            return RoutingDecision::new(
                Route::Conversational,
                0.90,
                "query is a greeting or general help request",
            );
        }

        if let Some(tool) = match_tool_trigger(&q) {
            return RoutingDecision::new(
                Route::ToolsOnly,
                0.85,
                format!("query matches the {tool} trigger vocabulary"),
            )
            .with_tool(tool);
        }

        if HOWTO_PHRASES.iter().any(|p| q.contains(p)) {
            return RoutingDecision::new(
                Route::Retrieval,
                0.75,
                "query seeks how-to information or documentation",
            )
            .with_search_query(query.trim());
        }

        RoutingDecision::new(Route::Combined, 0.30, "no clear pattern detected")
            .with_search_query(query.trim())
    }
}

#[async_trait]
impl ClassifierStrategy for RuleStrategy {
    async fn classify(
        &self,
        query: &str,
        _context: Option<&serde_json::Value>,
    ) -> Option<RoutingDecision> {
        Some(RuleStrategy::classify(self, query))
    }
}
