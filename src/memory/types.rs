// src/memory/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The two memory kinds. Each kind maps 1:1 onto a vector store collection
/// of the same name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Episodic,
    Semantic,
}

impl MemoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryType::Episodic => "episodic",
            MemoryType::Semantic => "semantic",
        }
    }

    /// Collection name in the vector store. Identical to the type name.
    pub fn collection(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Parse MemoryType from strings defensively (API/text interop).
impl FromStr for MemoryType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "episodic" => Ok(MemoryType::Episodic),
            "semantic" => Ok(MemoryType::Semantic),
            _ => Err(()),
        }
    }
}

/// Emotion metadata carried by episodic records.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmotionState {
    pub valence: f32,
    pub arousal: f32,
    pub labels: Vec<String>,
    pub intensity: f32,
}

/// Situational metadata carried by episodic records.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EpisodicContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Caller-supplied hints accompanying an insertion or classification call.
/// Everything is optional; presence of conversational/emotional hints biases
/// classification toward episodic, an explicit fact type toward semantic.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecordContext {
    pub speaker: Option<String>,
    pub emotion: Option<EmotionState>,
    pub location: Option<String>,
    pub conversation_id: Option<String>,
    pub fact_type: Option<String>,
    pub confidence_score: Option<f32>,
    pub importance_score: Option<f32>,
    pub source: Option<String>,
}

/// Primary record handed to the vector store on insertion. The core owns it
/// only until the write call returns; the canonical copy then lives in the
/// store and nothing here is mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub text: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub memory_type: MemoryType,
    pub importance_score: f32,
    pub source: String,

    // Episodic-only fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<EpisodicContext>,

    // Semantic-only fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fact_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A raw hit returned by the vector store before weighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub payload: serde_json::Value,
}

impl SearchHit {
    /// Recency key for tie-breaking: episodic records expose `timestamp`,
    /// semantic ones may be fresher under `last_updated`.
    pub fn recency(&self) -> Option<DateTime<Utc>> {
        let parse = |key: &str| {
            self.payload
                .get(key)
                .and_then(|v| v.as_str())
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc))
        };
        match (parse("last_updated"), parse("timestamp")) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

/// One merged search result. `weighted_score` is always
/// `raw_score * weight(source_collection)` — no normalization across
/// collections, so it can exceed the similarity metric's natural range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub record_id: String,
    pub source_collection: String,
    pub raw_score: f32,
    pub weighted_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub payload: serde_json::Value,
}

/// Aggregate response of a multi-collection search. `collection_stats`
/// counts only results that survived into the final truncated list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<RankedResult>,
    pub collection_stats: HashMap<String, usize>,
    pub degraded: bool,
    pub degraded_collections: Vec<String>,
}
