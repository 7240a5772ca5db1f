// src/error.rs
// Error taxonomy for the memory core. Callers match on these variants to
// decide whether a failure is theirs (InvalidArgument), recoverable
// (per-collection), or fatal (embedding, all collections down).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("embedding provider unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("collection '{collection}' unavailable: {reason}")]
    CollectionUnavailable { collection: String, reason: String },

    #[error("search against collection '{collection}' timed out")]
    Timeout { collection: String },

    #[error("all requested collections unavailable: {0:?}")]
    AllCollectionsUnavailable(Vec<String>),

    #[error("request cancelled")]
    Cancelled,

    #[error("vector store error: {0}")]
    Store(String),
}

impl MemoryError {
    /// True for per-collection failures the search orchestrator recovers from
    /// by omission; everything else aborts the whole operation.
    pub fn is_collection_local(&self) -> bool {
        matches!(
            self,
            MemoryError::CollectionUnavailable { .. } | MemoryError::Timeout { .. }
        )
    }
}
