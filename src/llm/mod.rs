// src/llm/mod.rs

pub mod embeddings;

pub use embeddings::OpenAiEmbeddings;
