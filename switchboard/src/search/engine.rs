//! Two-channel hybrid search orchestration.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::models::{IndexHit, SearchResult};
use crate::ports::{LexicalSearchPort, SearchError, SemanticSearchPort};
use crate::search::fusion::ResultFuser;

/// Error type for a retrieval call where no channel produced a signal.
///
/// Callers must be able to distinguish "no matches" (an `Ok` empty list)
/// from "search subsystem down"; this type is the latter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RetrievalError {
    /// Both retrieval channels failed.
    #[error("retrieval unavailable (lexical: {lexical}; semantic: {semantic})")]
    Unavailable {
        /// Why the lexical channel failed.
        lexical: SearchError,
        /// Why the semantic channel failed.
        semantic: SearchError,
    },
}

/// Orchestrates concurrent lexical and semantic queries and fuses the
/// results into one ranked, recency-adjusted list.
///
/// The two index calls are independent network I/O against separate
/// backing stores and always run concurrently; halving end-to-end latency
/// is the point of this design. A failed or timed-out channel degrades to
/// an empty result set for that channel; only both channels failing
/// surfaces as [`RetrievalError::Unavailable`].
#[derive(Debug, Clone)]
pub struct HybridSearchEngine {
    lexical: Arc<dyn LexicalSearchPort>,
    semantic: Arc<dyn SemanticSearchPort>,
    lexical_timeout: Duration,
    semantic_timeout: Duration,
    candidate_multiplier: usize,
}

impl HybridSearchEngine {
    /// Create an engine over the two injected index ports.
    pub fn new(
        lexical: Arc<dyn LexicalSearchPort>,
        semantic: Arc<dyn SemanticSearchPort>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            lexical,
            semantic,
            lexical_timeout: config.lexical_timeout,
            semantic_timeout: config.semantic_timeout,
            candidate_multiplier: config.candidate_multiplier.max(1),
        }
    }

    /// Run a hybrid search and return the top `top_k` fused results.
    ///
    /// Each channel is asked for `top_k * candidate_multiplier` candidates
    /// so fusion has overlap to work with. Fusion weights are selected per
    /// query by the error/technical heuristic.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RetrievalError> {
        let fetch = top_k.saturating_mul(self.candidate_multiplier).max(top_k);

        let (lexical, semantic) = tokio::join!(
            self.lexical_candidates(query, fetch),
            self.semantic_candidates(query, fetch),
        );

        let (lexical_hits, semantic_hits) = match (lexical, semantic) {
            (Err(lexical), Err(semantic)) => {
                return Err(RetrievalError::Unavailable { lexical, semantic });
            }
            (Ok(lexical), Ok(semantic)) => (lexical, semantic),
            (Ok(lexical), Err(error)) => {
                warn!(%error, "semantic channel failed; continuing lexical-only");
                (lexical, Vec::new())
            }
            (Err(error), Ok(semantic)) => {
                warn!(%error, "lexical channel failed; continuing semantic-only");
                (Vec::new(), semantic)
            }
        };

        let fuser = ResultFuser::for_query(query);
        debug!(
            lexical_hits = lexical_hits.len(),
            semantic_hits = semantic_hits.len(),
            lexical_weight = fuser.weights().lexical,
            semantic_weight = fuser.weights().semantic,
            "fusing retrieval channels"
        );

        let fused = fuser.fuse(lexical_hits, semantic_hits);
        let mut ranked = fuser.apply_recency(fused, Utc::now());
        ranked.truncate(top_k);
        Ok(ranked)
    }

    async fn lexical_candidates(
        &self,
        query: &str,
        fetch: usize,
    ) -> Result<Vec<IndexHit>, SearchError> {
        match tokio::time::timeout(self.lexical_timeout, self.lexical.search(query, fetch, None))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(self.lexical_timeout.as_millis() as u64)),
        }
    }

    /// Embedding and vector lookup share one time budget: a slow embedding
    /// call must not let the whole request overrun.
    async fn semantic_candidates(
        &self,
        query: &str,
        fetch: usize,
    ) -> Result<Vec<IndexHit>, SearchError> {
        let lookup = async {
            let vector = self.semantic.embed(query).await?;
            self.semantic.search(&vector, fetch).await
        };

        match tokio::time::timeout(self.semantic_timeout, lookup).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(
                self.semantic_timeout.as_millis() as u64
            )),
        }
    }
}
