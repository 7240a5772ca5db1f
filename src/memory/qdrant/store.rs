// src/memory/qdrant/store.rs

//! Implements VectorStore against the Qdrant REST API.
//!
//! Transport errors surface as `CollectionUnavailable` (or `Timeout` when the
//! HTTP client's own deadline fires) so the search orchestrator can apply its
//! per-collection degradation policy.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use async_trait::async_trait;

use crate::config::EngramConfig;
use crate::error::MemoryError;
use crate::memory::traits::VectorStore;
use crate::memory::types::{MemoryRecord, SearchHit};

pub struct QdrantMemoryStore {
    client: Client,
    base_url: String,
    vector_dim: usize,
}

impl QdrantMemoryStore {
    pub fn new(config: &EngramConfig) -> Result<Self, MemoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.qdrant_timeout_secs))
            .build()
            .map_err(|e| MemoryError::Store(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.qdrant_url.trim_end_matches('/').to_string(),
            vector_dim: config.qdrant_embedding_dim,
        })
    }

    /// Ensures a collection exists with the configured vector size.
    /// Safe to call multiple times; only creates when missing.
    pub async fn ensure_collection(&self, name: &str) -> Result<(), MemoryError> {
        let url = format!("{}/collections/{}", self.base_url, name);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(name, e))?;
        if resp.status().is_success() {
            return Ok(());
        }

        let req_body = json!({
            "vectors": {
                "size": self.vector_dim,
                "distance": "Cosine"
            }
        });

        let resp = self
            .client
            .put(&url)
            .json(&req_body)
            .send()
            .await
            .map_err(|e| self.transport_error(name, e))?;

        let status = resp.status();
        let err_body = resp.text().await.unwrap_or_default();
        if status.is_success() || status.as_u16() == 409 || err_body.contains("already exists") {
            info!("Qdrant collection '{}' ready", name);
            Ok(())
        } else {
            Err(MemoryError::CollectionUnavailable {
                collection: name.to_string(),
                reason: format!("create failed: {}", err_body),
            })
        }
    }

    fn transport_error(&self, collection: &str, e: reqwest::Error) -> MemoryError {
        if e.is_timeout() {
            MemoryError::Timeout {
                collection: collection.to_string(),
            }
        } else {
            MemoryError::CollectionUnavailable {
                collection: collection.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

/// Qdrant point ids may be integers or UUID strings; normalize to string.
fn point_id_to_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl VectorStore for QdrantMemoryStore {
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, MemoryError> {
        let url = format!("{}/collections/{}/points/search", self.base_url, collection);

        let req_body = json!({
            "vector": vector,
            "limit": limit,
            "with_payload": true,
            "filter": {
                "must": [{
                    "key": "user_id",
                    "match": { "value": user_id }
                }]
            }
        });

        debug!("Searching Qdrant collection '{}' for user {}", collection, user_id);

        let resp = self
            .client
            .post(&url)
            .json(&req_body)
            .send()
            .await
            .map_err(|e| self.transport_error(collection, e))?;

        if !resp.status().is_success() {
            return Err(MemoryError::CollectionUnavailable {
                collection: collection.to_string(),
                reason: resp.text().await.unwrap_or_default(),
            });
        }

        let resp_json: Value = resp
            .json()
            .await
            .map_err(|e| self.transport_error(collection, e))?;

        let mut hits = Vec::new();
        if let Some(points) = resp_json.get("result").and_then(|r| r.as_array()) {
            for point in points {
                let id = match point.get("id") {
                    Some(id) => point_id_to_string(id),
                    None => continue,
                };
                let score = point
                    .get("score")
                    .and_then(|s| s.as_f64())
                    .unwrap_or(0.0) as f32;
                let payload = point.get("payload").cloned().unwrap_or(json!({}));
                hits.push(SearchHit { id, score, payload });
            }
        }

        debug!("Qdrant '{}' returned {} hits", collection, hits.len());
        Ok(hits)
    }

    async fn write(
        &self,
        collection: &str,
        record: &MemoryRecord,
        vector: &[f32],
    ) -> Result<String, MemoryError> {
        self.ensure_collection(collection).await?;

        let url = format!("{}/collections/{}/points", self.base_url, collection);

        let payload =
            serde_json::to_value(record).map_err(|e| MemoryError::Store(e.to_string()))?;

        let point = json!({
            "id": record.id,
            "vector": vector,
            "payload": payload,
        });

        let req_body = json!({ "points": [ point ] });

        let resp = self
            .client
            .put(&url)
            .json(&req_body)
            .send()
            .await
            .map_err(|e| self.transport_error(collection, e))?;

        if !resp.status().is_success() {
            return Err(MemoryError::Store(format!(
                "Qdrant upsert into '{}' failed: {}",
                collection,
                resp.text().await.unwrap_or_default()
            )));
        }

        Ok(record.id.clone())
    }
}
