// src/memory/traits.rs

//! Narrow async seams to the external collaborators. All embedding and
//! vector-store traffic goes through these traits — no direct HTTP calls
//! in business logic, and tests substitute mocks here.

use async_trait::async_trait;

use crate::error::MemoryError;
use crate::memory::types::{MemoryRecord, SearchHit};

/// Turns text into a query/record vector. A failure here is fatal for the
/// operation that needed the vector — there is no partial embedding.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError>;
}

/// The external vector index. Collections are named partitions; every call
/// is scoped to one collection and (for search) one user.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Top-`limit` nearest neighbors for `vector` within `collection`,
    /// restricted to records owned by `user_id`.
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, MemoryError>;

    /// Persists one record with its embedding into `collection`, returning
    /// the record id.
    async fn write(
        &self,
        collection: &str,
        record: &MemoryRecord,
        vector: &[f32],
    ) -> Result<String, MemoryError>;
}
