// src/memory/service.rs
// Facade over the classification core and the search aggregator. This is the
// surface the (out-of-scope) API layer calls: classify previews, gated
// insertion, multi-collection search.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EngramConfig;
use crate::error::MemoryError;
use crate::memory::classifier::ClassificationResult;
use crate::memory::router::MemoryRouter;
use crate::memory::search::{SearchOrchestrator, SearchRequest};
use crate::memory::traits::{EmbeddingProvider, VectorStore};
use crate::memory::types::{
    EpisodicContext, MemoryRecord, MemoryType, RecordContext, SearchOutcome,
};

/// Search call as the caller phrases it; unset fields fall back to the
/// service defaults (all collections, configured limit and threshold).
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub query: String,
    pub user_id: String,
    pub collections: Option<Vec<String>>,
    pub weights: Option<HashMap<String, f32>>,
    pub limit: Option<usize>,
    pub similarity_threshold: Option<f32>,
}

/// What the caller gets back after an insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertReceipt {
    pub id: String,
    pub memory_type: MemoryType,
    pub collection: String,
    pub timestamp: DateTime<Utc>,
    /// None when the caller supplied an explicit type (manual path).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationResult>,
}

/// Tunables the service reads once at construction.
#[derive(Debug, Clone)]
pub struct ServiceDefaults {
    pub default_limit: usize,
    pub max_limit: usize,
    pub similarity_threshold: f32,
    pub collection_timeout: Duration,
}

impl ServiceDefaults {
    pub fn from_config(config: &EngramConfig) -> Self {
        Self {
            default_limit: config.search_default_limit,
            max_limit: config.search_max_limit,
            similarity_threshold: config.similarity_threshold,
            collection_timeout: Duration::from_millis(config.collection_search_timeout_ms),
        }
    }
}

pub struct MemoryService {
    router: MemoryRouter,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    orchestrator: SearchOrchestrator,
    defaults: ServiceDefaults,
}

impl MemoryService {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        router: MemoryRouter,
        defaults: ServiceDefaults,
    ) -> Self {
        let orchestrator = SearchOrchestrator::new(
            Arc::clone(&embedder),
            Arc::clone(&store),
            defaults.collection_timeout,
        );
        Self {
            router,
            embedder,
            store,
            orchestrator,
            defaults,
        }
    }

    /// Classification preview: runs the same extractor/classifier pair as the
    /// insertion gate but stores nothing.
    pub fn classify(&self, text: &str, context: Option<&RecordContext>) -> ClassificationResult {
        self.router.classify(text, context)
    }

    /// Classifies (or honors an explicit type), embeds, and writes one record
    /// into the routed collection.
    pub async fn remember(
        &self,
        text: &str,
        user_id: &str,
        context: Option<RecordContext>,
        explicit_type: Option<MemoryType>,
    ) -> Result<InsertReceipt, MemoryError> {
        if text.trim().is_empty() {
            return Err(MemoryError::InvalidArgument("text must not be empty".into()));
        }
        if user_id.trim().is_empty() {
            return Err(MemoryError::InvalidArgument("user_id must not be empty".into()));
        }

        let decision = self.router.route(text, context.as_ref(), explicit_type);
        let record = build_record(text, user_id, decision.memory_type, context);

        debug!(
            collection = %decision.collection,
            manual = decision.classification.is_none(),
            "storing memory record"
        );

        let vector = self.embedder.embed(text).await?;
        let id = self
            .store
            .write(&decision.collection, &record, &vector)
            .await?;

        info!(id = %id, collection = %decision.collection, "memory stored");

        Ok(InsertReceipt {
            id,
            memory_type: decision.memory_type,
            collection: decision.collection,
            timestamp: record.timestamp,
            classification: decision.classification,
        })
    }

    /// Multi-collection search with config defaults filled in.
    pub async fn search(
        &self,
        query: SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, MemoryError> {
        let collections = query.collections.unwrap_or_else(|| {
            vec![
                MemoryType::Episodic.collection().to_string(),
                MemoryType::Semantic.collection().to_string(),
            ]
        });
        let limit = query
            .limit
            .unwrap_or(self.defaults.default_limit)
            .min(self.defaults.max_limit);

        let request = SearchRequest {
            query: query.query,
            user_id: query.user_id,
            collections,
            weights: query.weights.unwrap_or_default(),
            limit,
            similarity_threshold: query
                .similarity_threshold
                .unwrap_or(self.defaults.similarity_threshold),
        };

        self.orchestrator.search(&request, cancel).await
    }
}

/// Assembles the record handed to the vector store. Type-specific fields are
/// populated from the caller's context; the other kind's fields stay empty.
fn build_record(
    text: &str,
    user_id: &str,
    memory_type: MemoryType,
    context: Option<RecordContext>,
) -> MemoryRecord {
    let now = Utc::now();
    let ctx = context.unwrap_or_default();

    let mut record = MemoryRecord {
        id: Uuid::new_v4().to_string(),
        text: text.to_string(),
        user_id: user_id.to_string(),
        timestamp: now,
        memory_type,
        importance_score: ctx.importance_score.unwrap_or(0.5),
        source: ctx.source.unwrap_or_else(|| "conversation".to_string()),
        speaker: None,
        emotion: None,
        context: None,
        fact_type: None,
        confidence_score: None,
        last_updated: None,
    };

    match memory_type {
        MemoryType::Episodic => {
            record.speaker = ctx.speaker;
            record.emotion = ctx.emotion;
            if ctx.location.is_some() || ctx.conversation_id.is_some() {
                record.context = Some(EpisodicContext {
                    location: ctx.location,
                    conversation_id: ctx.conversation_id,
                });
            }
        }
        MemoryType::Semantic => {
            record.fact_type = Some(ctx.fact_type.unwrap_or_else(|| "personal_fact".to_string()));
            record.confidence_score = Some(ctx.confidence_score.unwrap_or(1.0));
            record.last_updated = Some(now);
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episodic_record_carries_episodic_payload_only() {
        let ctx = RecordContext {
            speaker: Some("user".into()),
            conversation_id: Some("c-7".into()),
            ..Default::default()
        };
        let record = build_record("오늘 기분이 좋아", "u1", MemoryType::Episodic, Some(ctx));
        assert_eq!(record.speaker.as_deref(), Some("user"));
        assert_eq!(
            record.context.as_ref().unwrap().conversation_id.as_deref(),
            Some("c-7")
        );
        assert!(record.fact_type.is_none());
        assert!(record.last_updated.is_none());
    }

    #[test]
    fn semantic_record_carries_fact_metadata() {
        let record = build_record("물은 100도에서 끓는다", "u1", MemoryType::Semantic, None);
        assert_eq!(record.fact_type.as_deref(), Some("personal_fact"));
        assert_eq!(record.confidence_score, Some(1.0));
        assert_eq!(record.last_updated, Some(record.timestamp));
        assert!(record.speaker.is_none());
        assert!(record.emotion.is_none());
    }

    #[test]
    fn records_get_fresh_ids() {
        let a = build_record("a", "u1", MemoryType::Semantic, None);
        let b = build_record("a", "u1", MemoryType::Semantic, None);
        assert_ne!(a.id, b.id);
    }
}
