// src/config/mod.rs
// All infrastructure settings come from the environment (.env supported).
// Cue tables and scoring weights are NOT here: they are explicit values
// passed into the extractor/classifier so tests can substitute them.

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct EngramConfig {
    // ── Qdrant Configuration
    pub qdrant_url: String,
    pub qdrant_embedding_dim: usize,
    pub qdrant_timeout_secs: u64,

    // ── Embedding Service Configuration (OpenAI-compatible)
    pub embedding_base_url: String,
    pub embedding_api_key: String,
    pub embedding_model: String,
    pub embedding_timeout_secs: u64,

    // ── Search Defaults
    pub search_default_limit: usize,
    pub search_max_limit: usize,
    pub similarity_threshold: f32,
    /// Per-collection search timeout in milliseconds. Keep this below the
    /// caller's own request timeout so a slow collection degrades the
    /// response instead of killing it.
    pub collection_search_timeout_ms: u64,
}

// Parses env values defensively: trims whitespace and strips inline comments
// before parsing, falls back to the default on any parse failure.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl EngramConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            qdrant_url: env_var_or("ENGRAM_QDRANT_URL", "http://localhost:6333".to_string()),
            qdrant_embedding_dim: env_var_or("ENGRAM_QDRANT_EMBEDDING_DIM", 1536),
            qdrant_timeout_secs: env_var_or("ENGRAM_QDRANT_TIMEOUT", 10),
            embedding_base_url: env_var_or(
                "ENGRAM_EMBEDDING_BASE_URL",
                "https://api.openai.com".to_string(),
            ),
            embedding_api_key: env_var_or("OPENAI_API_KEY", String::new()),
            embedding_model: env_var_or(
                "ENGRAM_EMBEDDING_MODEL",
                "text-embedding-3-small".to_string(),
            ),
            embedding_timeout_secs: env_var_or("ENGRAM_EMBEDDING_TIMEOUT", 30),
            search_default_limit: env_var_or("ENGRAM_SEARCH_DEFAULT_LIMIT", 10),
            search_max_limit: env_var_or("ENGRAM_SEARCH_MAX_LIMIT", 100),
            similarity_threshold: env_var_or("ENGRAM_SIMILARITY_THRESHOLD", 0.0),
            collection_search_timeout_ms: env_var_or("ENGRAM_COLLECTION_SEARCH_TIMEOUT_MS", 5000),
        }
    }
}

pub static CONFIG: Lazy<EngramConfig> = Lazy::new(EngramConfig::from_env);
