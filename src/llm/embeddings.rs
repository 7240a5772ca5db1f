// src/llm/embeddings.rs
// Query/record embedding via an OpenAI-compatible /v1/embeddings endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::EngramConfig;
use crate::error::MemoryError;
use crate::memory::traits::EmbeddingProvider;

pub struct OpenAiEmbeddings {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbeddings {
    pub fn new(config: &EngramConfig) -> Result<Self, MemoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.embedding_timeout_secs))
            .build()
            .map_err(|e| MemoryError::EmbeddingUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.embedding_base_url.trim_end_matches('/').to_string(),
            api_key: config.embedding_api_key.clone(),
            model: config.embedding_model.clone(),
            dimensions: config.qdrant_embedding_dim,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        let body = json!({
            "model": self.model,
            "input": text,
            "dimensions": self.dimensions,
        });

        debug!("Requesting embedding for {} chars with model {}", text.len(), self.model);

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| MemoryError::EmbeddingUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "<no body>".into());
            return Err(MemoryError::EmbeddingUnavailable(format!(
                "embedding API error ({}): {}",
                status, error_text
            )));
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| MemoryError::EmbeddingUnavailable(e.to_string()))?;

        let embedding = result
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .ok_or_else(|| {
                MemoryError::EmbeddingUnavailable("no embedding data in API response".into())
            })?;

        debug!("Generated embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }
}

// Internal structs for deserializing the embeddings API response.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
