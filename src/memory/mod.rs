// src/memory/mod.rs

pub mod classifier;
pub mod qdrant;
pub mod router;
pub mod search;
pub mod service;
pub mod traits;
pub mod types;

pub use classifier::features::{CueTable, FeatureCounts, FeatureExtractor};
pub use classifier::{ClassificationResult, Classifier, ConfidenceBand, ScoringWeights};
pub use router::{MemoryRouter, RoutingDecision};
pub use search::{SearchOrchestrator, SearchRequest};
pub use service::{InsertReceipt, MemoryService, SearchQuery, ServiceDefaults};
pub use traits::{EmbeddingProvider, VectorStore};
pub use types::{MemoryRecord, MemoryType, RankedResult, RecordContext, SearchOutcome};
