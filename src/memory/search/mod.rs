// src/memory/search/mod.rs

//! Multi-collection hybrid search: one embedding, parallel per-collection
//! fan-out, weighted merge. Collections fail independently — a broken
//! collection degrades the response instead of killing it, unless every
//! collection is broken.

pub mod merger;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::MemoryError;
use crate::memory::traits::{EmbeddingProvider, VectorStore};
use crate::memory::types::{RankedResult, SearchHit, SearchOutcome};

/// One multi-collection query. Weights default to 1.0 for any collection not
/// listed; the threshold discards raw hits before weighting.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub user_id: String,
    pub collections: Vec<String>,
    pub weights: HashMap<String, f32>,
    pub limit: usize,
    pub similarity_threshold: f32,
}

pub struct SearchOrchestrator {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    /// Per-collection search budget. Keep below the caller's own request
    /// timeout so a slow collection is reported as degraded, not as a
    /// caller-visible hang.
    collection_timeout: Duration,
}

impl SearchOrchestrator {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        collection_timeout: Duration,
    ) -> Self {
        Self {
            embedder,
            store,
            collection_timeout,
        }
    }

    /// Runs the full fan-out/merge pipeline. Cancelling `cancel` promptly
    /// tears down every outstanding per-collection call.
    pub async fn search(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, MemoryError> {
        validate(request)?;

        // The query vector is resolved exactly once and shared across all
        // collections; no per-collection re-embedding.
        let vector = tokio::select! {
            _ = cancel.cancelled() => return Err(MemoryError::Cancelled),
            embedded = self.embedder.embed(&request.query) => embedded?,
        };
        let vector = Arc::new(vector);

        debug!(
            collections = request.collections.len(),
            limit = request.limit,
            "dispatching parallel collection searches"
        );

        let handles: Vec<_> = request
            .collections
            .iter()
            .map(|name| {
                let store = Arc::clone(&self.store);
                let vector = Arc::clone(&vector);
                let user_id = request.user_id.clone();
                let collection = name.clone();
                let cancel = cancel.clone();
                let budget = self.collection_timeout;
                // At least `limit` raw hits per collection so the merged
                // list can survive post-merge truncation.
                let per_collection_limit = request.limit;

                let task = tokio::spawn(async move {
                    tokio::select! {
                        _ = cancel.cancelled() => Err(MemoryError::Cancelled),
                        searched = tokio::time::timeout(
                            budget,
                            store.search(&collection, &vector, &user_id, per_collection_limit),
                        ) => match searched {
                            Ok(hits) => hits,
                            Err(_) => Err(MemoryError::Timeout { collection }),
                        },
                    }
                });
                (name.clone(), task)
            })
            .collect();

        // Join barrier: every branch completes, times out, or is cancelled
        // before any merging happens.
        let settled = futures::future::join_all(
            handles
                .into_iter()
                .map(|(name, task)| async move { (name, task.await) }),
        )
        .await;

        let mut candidates: Vec<RankedResult> = Vec::new();
        let mut degraded_collections: Vec<String> = Vec::new();

        for (collection, joined) in settled {
            match joined {
                Ok(Ok(hits)) => {
                    let weight = request.weights.get(&collection).copied().unwrap_or(1.0);
                    candidates.extend(weigh_hits(
                        hits,
                        &collection,
                        weight,
                        request.similarity_threshold,
                    ));
                }
                Ok(Err(MemoryError::Cancelled)) => return Err(MemoryError::Cancelled),
                Ok(Err(e)) => {
                    warn!(collection = %collection, error = %e, "collection search failed, omitting");
                    degraded_collections.push(collection);
                }
                Err(e) => {
                    warn!(collection = %collection, error = %e, "collection search task panicked, omitting");
                    degraded_collections.push(collection);
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(MemoryError::Cancelled);
        }

        if degraded_collections.len() == request.collections.len() {
            return Err(MemoryError::AllCollectionsUnavailable(degraded_collections));
        }

        let (results, collection_stats) = merger::merge(candidates, request.limit);

        info!(
            results = results.len(),
            degraded = !degraded_collections.is_empty(),
            "multi-collection search complete"
        );

        Ok(SearchOutcome {
            results,
            collection_stats,
            degraded: !degraded_collections.is_empty(),
            degraded_collections,
        })
    }
}

fn validate(request: &SearchRequest) -> Result<(), MemoryError> {
    if request.query.trim().is_empty() {
        return Err(MemoryError::InvalidArgument("query must not be empty".into()));
    }
    if request.user_id.trim().is_empty() {
        return Err(MemoryError::InvalidArgument("user_id must not be empty".into()));
    }
    if request.collections.is_empty() {
        return Err(MemoryError::InvalidArgument(
            "at least one collection is required".into(),
        ));
    }
    if request.limit == 0 {
        return Err(MemoryError::InvalidArgument("limit must be positive".into()));
    }
    for (collection, weight) in &request.weights {
        if !weight.is_finite() || *weight <= 0.0 {
            return Err(MemoryError::InvalidArgument(format!(
                "weight for collection '{}' must be a positive number",
                collection
            )));
        }
    }
    Ok(())
}

/// Threshold filter then weighting. `weighted_score` is a deterministic
/// function of the raw score and the collection weight — nothing is
/// renormalized across collections, so weighted scores may leave the
/// similarity metric's natural range.
fn weigh_hits(
    hits: Vec<SearchHit>,
    collection: &str,
    weight: f32,
    threshold: f32,
) -> Vec<RankedResult> {
    hits.into_iter()
        .filter(|hit| hit.score >= threshold)
        .map(|hit| RankedResult {
            record_id: hit.id.clone(),
            source_collection: collection.to_string(),
            raw_score: hit.score,
            weighted_score: hit.score * weight,
            timestamp: hit.recency(),
            payload: hit.payload,
        })
        .collect()
}
