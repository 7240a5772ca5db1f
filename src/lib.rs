// src/lib.rs

pub mod config;
pub mod error;
pub mod llm;
pub mod memory;

pub use error::MemoryError;
