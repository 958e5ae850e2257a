//! Scored retrieval results, raw and fused.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single hit as returned by a lexical or semantic index, before fusion.
///
/// `score` is on whatever scale the backing index uses (BM25 scores are
/// unbounded, cosine similarities live in `[-1, 1]`); the fusion stage
/// normalizes each channel independently before combining them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexHit {
    /// Stable document/chunk identifier within the index.
    pub id: String,

    /// The chunk text.
    pub content: String,

    /// Index-provided metadata (source URL, title, publication date, ...).
    #[serde(default)]
    pub metadata: serde_json::Value,

    /// Raw relevance score from the backing index.
    pub score: f32,
}

impl IndexHit {
    /// Convenience constructor for a hit with no metadata.
    pub fn new(id: impl Into<String>, content: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: serde_json::Value::Null,
            score,
        }
    }
}

/// One fused, recency-adjusted result.
///
/// Instances are produced by the hybrid search engine per retrieval call and
/// are ephemeral; each `id` appears at most once per fused result set. When
/// the same document is returned by both channels its two partial scores are
/// merged into one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document/chunk identifier, unique within one fused result set.
    pub id: String,

    /// The chunk text.
    pub content: String,

    /// Metadata carried over from the winning index hit.
    pub metadata: serde_json::Value,

    /// Raw lexical score, 0.0 when the lexical channel did not return this
    /// document.
    pub lexical_score_raw: f32,

    /// Raw semantic score, 0.0 when the semantic channel did not return
    /// this document.
    pub semantic_score_raw: f32,

    /// Lexical score min-max normalized against the lexical result set.
    pub lexical_score_norm: f32,

    /// Semantic score min-max normalized against the semantic result set.
    pub semantic_score_norm: f32,

    /// Recency multiplier applied after fusion; 1.0 is neutral.
    pub recency_multiplier: f32,

    /// The fused, recency-adjusted relevance score used for ranking.
    pub final_score: f32,

    /// Content timestamp parsed from metadata, when one was present and
    /// parseable.
    pub content_timestamp: Option<DateTime<Utc>>,
}
