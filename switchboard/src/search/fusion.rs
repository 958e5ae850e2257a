//! Weighted fusion of lexical and semantic result sets.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{IndexHit, SearchResult};
use crate::search::{normalize, recency};

lazy_static! {
    /// Vocabulary of diagnosing specific failures: errors, outages,
    /// troubleshooting.
    static ref TECHNICAL_VOCAB: Regex = Regex::new(
        r"(?i)\b(error|errors|failed|failure|failing|timeout|timed out|down|outage|status|not working|troubleshoot|troubleshooting|issue|issues|bug|crash|exception|declined|invalid|denied|rejected)\b"
    )
    .expect("technical vocabulary regex");

    /// snake_case error codes as emitted by payment/API platforms.
    static ref ERROR_CODE: Regex = Regex::new(
        r"(?i)\b(err_\w+|\w+_error|\w+_declined|\w+_expired|insufficient_\w+|invalid_\w+)\b"
    )
    .expect("error code regex");

    /// Standalone 4xx/5xx HTTP status codes.
    static ref HTTP_STATUS: Regex = Regex::new(r"\b[45]\d{2}\b").expect("http status regex");
}

/// Channel weights for the linear fusion step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    /// Weight applied to the normalized lexical score.
    pub lexical: f32,
    /// Weight applied to the normalized semantic score.
    pub semantic: f32,
}

impl FusionWeights {
    /// Weights for error/technical queries, where exact-term matching
    /// matters more than conceptual similarity.
    pub const TECHNICAL: Self = Self {
        lexical: 0.6,
        semantic: 0.4,
    };

    /// Weights for everything else: how-to and conceptual questions lean
    /// on semantic similarity.
    pub const CONCEPTUAL: Self = Self {
        lexical: 0.3,
        semantic: 0.7,
    };

    /// Pick weights for a query based on the error/technical heuristic.
    pub fn for_query(query: &str) -> Self {
        if is_technical_query(query) {
            Self::TECHNICAL
        } else {
            Self::CONCEPTUAL
        }
    }
}

/// Whether a query looks like it is diagnosing a specific failure: error
/// vocabulary, platform error codes, or HTTP status codes.
pub fn is_technical_query(query: &str) -> bool {
    TECHNICAL_VOCAB.is_match(query) || ERROR_CODE.is_match(query) || HTTP_STATUS.is_match(query)
}

/// Merges two scored result sets into one ranked list.
///
/// Each channel is min-max normalized independently, hits are merged by
/// document id (a document returned by both channels gets one record with
/// both partial scores), and the fused score is the weighted linear
/// combination of the normalized scores. [`ResultFuser::apply_recency`]
/// then multiplies in the time-decay factor and re-sorts.
#[derive(Debug, Clone)]
pub struct ResultFuser {
    weights: FusionWeights,
}

impl ResultFuser {
    /// Create a fuser with explicit weights.
    pub fn new(weights: FusionWeights) -> Self {
        Self { weights }
    }

    /// Create a fuser with weights selected for `query`.
    pub fn for_query(query: &str) -> Self {
        Self::new(FusionWeights::for_query(query))
    }

    /// The weights this fuser applies.
    pub fn weights(&self) -> FusionWeights {
        self.weights
    }

    /// Fuse a lexical and a semantic result set.
    ///
    /// Either side may be empty; fusion then degrades to the other side's
    /// normalized score. Both sides empty yields an empty list. Insertion
    /// order (lexical hits first, then previously-unseen semantic hits) is
    /// preserved so that downstream stable sorts break ties
    /// deterministically.
    pub fn fuse(&self, lexical: Vec<IndexHit>, semantic: Vec<IndexHit>) -> Vec<SearchResult> {
        let lexical_norms =
            normalize::min_max(&lexical.iter().map(|h| h.score).collect::<Vec<_>>());
        let semantic_norms =
            normalize::min_max(&semantic.iter().map(|h| h.score).collect::<Vec<_>>());

        let mut fused: Vec<SearchResult> = Vec::with_capacity(lexical.len() + semantic.len());
        let mut index_by_id: HashMap<String, usize> = HashMap::new();

        for (hit, norm) in lexical.into_iter().zip(lexical_norms) {
            let timestamp = recency::timestamp_from_metadata(&hit.metadata);
            index_by_id.insert(hit.id.clone(), fused.len());
            fused.push(SearchResult {
                id: hit.id,
                content: hit.content,
                metadata: hit.metadata,
                lexical_score_raw: hit.score,
                semantic_score_raw: 0.0,
                lexical_score_norm: norm,
                semantic_score_norm: 0.0,
                recency_multiplier: 1.0,
                final_score: self.weights.lexical * norm,
                content_timestamp: timestamp,
            });
        }

        for (hit, norm) in semantic.into_iter().zip(semantic_norms) {
            match index_by_id.get(&hit.id) {
                Some(&position) => {
                    let existing = &mut fused[position];
                    existing.semantic_score_raw = hit.score;
                    existing.semantic_score_norm = norm;
                    existing.final_score = self.weights.lexical * existing.lexical_score_norm
                        + self.weights.semantic * norm;
                }
                None => {
                    let timestamp = recency::timestamp_from_metadata(&hit.metadata);
                    index_by_id.insert(hit.id.clone(), fused.len());
                    fused.push(SearchResult {
                        id: hit.id,
                        content: hit.content,
                        metadata: hit.metadata,
                        lexical_score_raw: 0.0,
                        semantic_score_raw: hit.score,
                        lexical_score_norm: 0.0,
                        semantic_score_norm: norm,
                        recency_multiplier: 1.0,
                        final_score: self.weights.semantic * norm,
                        content_timestamp: timestamp,
                    });
                }
            }
        }

        fused
    }

    /// Multiply each fused score by its recency factor and re-sort
    /// descending.
    ///
    /// Applied strictly after fusion: the final ranking is not guaranteed
    /// to equal the pre-recency ranking. The sort is stable, so equal
    /// scores keep their insertion order.
    pub fn apply_recency(
        &self,
        mut results: Vec<SearchResult>,
        now: DateTime<Utc>,
    ) -> Vec<SearchResult> {
        for result in &mut results {
            result.recency_multiplier = recency::boost(result.content_timestamp, now);
            result.final_score *= result.recency_multiplier;
        }

        results.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn hit(id: &str, score: f32) -> IndexHit {
        IndexHit::new(id, format!("content of {id}"), score)
    }

    fn dated_hit(id: &str, score: f32, now: DateTime<Utc>, age_days: i64) -> IndexHit {
        let mut hit = hit(id, score);
        hit.metadata = serde_json::json!({
            "published_at": (now - Duration::days(age_days)).to_rfc3339(),
        });
        hit
    }

    #[test]
    fn technical_queries_take_the_lexical_heavy_branch() {
        assert_eq!(
            FusionWeights::for_query("error 500 timeout issue"),
            FusionWeights::TECHNICAL
        );
        assert_eq!(
            FusionWeights::for_query("card_declined on checkout"),
            FusionWeights::TECHNICAL
        );
        assert_eq!(
            FusionWeights::for_query("how do I set up webhooks"),
            FusionWeights::CONCEPTUAL
        );
    }

    #[test]
    fn dual_channel_hits_merge_into_one_record() {
        // Lexical returns x; semantic returns x and y; weights 0.3/0.7.
        let fuser = ResultFuser::new(FusionWeights::CONCEPTUAL);
        let fused = fuser.fuse(
            vec![hit("x", 5.0)],
            vec![hit("x", 0.9), hit("y", 0.2)],
        );

        assert_eq!(fused.len(), 2);
        let x = fused.iter().find(|r| r.id == "x").expect("x present");
        let y = fused.iter().find(|r| r.id == "y").expect("y present");

        // Single-item lexical set normalizes to the degenerate constant;
        // x combines both channels and outranks y.
        assert_eq!(x.lexical_score_norm, normalize::DEGENERATE_NORM);
        assert_eq!(x.semantic_score_norm, 1.0);
        assert!((x.final_score - (0.3 * 0.5 + 0.7 * 1.0)).abs() < 1e-6);
        assert!((y.final_score - 0.0).abs() < 1e-6);
        assert!(x.final_score > y.final_score);
    }

    #[test]
    fn one_empty_channel_degrades_gracefully() {
        let fuser = ResultFuser::new(FusionWeights::CONCEPTUAL);

        let semantic_only = fuser.fuse(Vec::new(), vec![hit("a", 0.8), hit("b", 0.4)]);
        assert_eq!(semantic_only.len(), 2);
        assert!(semantic_only.iter().all(|r| r.lexical_score_raw == 0.0));

        let lexical_only = fuser.fuse(vec![hit("a", 3.0)], Vec::new());
        assert_eq!(lexical_only.len(), 1);

        assert!(fuser.fuse(Vec::new(), Vec::new()).is_empty());
    }

    #[test]
    fn raising_a_raw_score_never_lowers_the_fused_score() {
        let fuser = ResultFuser::new(FusionWeights::CONCEPTUAL);
        let base = fuser.fuse(
            vec![hit("a", 2.0), hit("b", 4.0)],
            vec![hit("a", 0.5), hit("b", 0.3)],
        );
        let bumped = fuser.fuse(
            vec![hit("a", 3.5), hit("b", 4.0)],
            vec![hit("a", 0.5), hit("b", 0.3)],
        );

        let score = |set: &[SearchResult], id: &str| {
            set.iter().find(|r| r.id == id).map(|r| r.final_score)
        };
        assert!(score(&bumped, "a") >= score(&base, "a"));
    }

    #[test]
    fn younger_of_two_equal_results_ranks_first_after_recency() {
        let now = Utc::now();
        let fuser = ResultFuser::new(FusionWeights::CONCEPTUAL);

        // Equal raw scores in the same channel, different ages.
        let fused = fuser.fuse(
            Vec::new(),
            vec![
                dated_hit("old", 0.5, now, 400),
                dated_hit("young", 0.5, now, 10),
            ],
        );
        let ranked = fuser.apply_recency(fused, now);

        assert_eq!(ranked[0].id, "young");
        assert_eq!(ranked[0].recency_multiplier, 1.5);
        assert!(ranked[1].recency_multiplier < 1.0);
    }

    #[test]
    fn undated_results_rank_below_fresh_ones_at_equal_score() {
        let now = Utc::now();
        let fuser = ResultFuser::new(FusionWeights::CONCEPTUAL);

        let fused = fuser.fuse(
            Vec::new(),
            vec![hit("undated", 0.5), dated_hit("fresh", 0.5, now, 10)],
        );
        let ranked = fuser.apply_recency(fused, now);

        assert_eq!(ranked[0].id, "fresh");
        assert_eq!(ranked[1].id, "undated");
        assert_eq!(ranked[1].recency_multiplier, 1.0);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let now = Utc::now();
        let fuser = ResultFuser::new(FusionWeights::CONCEPTUAL);

        let fused = fuser.fuse(
            vec![hit("first", 1.0), hit("second", 1.0)],
            Vec::new(),
        );
        let ranked = fuser.apply_recency(fused, now);

        assert_eq!(ranked[0].id, "first");
        assert_eq!(ranked[1].id, "second");
    }
}
