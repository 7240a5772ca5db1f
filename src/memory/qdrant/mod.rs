// src/memory/qdrant/mod.rs

pub mod store;

pub use store::QdrantMemoryStore;
