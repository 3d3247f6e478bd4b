//! # aurora-embeddings
//!
//! The optional semantic signal. A source is selected from config
//! (`none` or `hashing`), chunk-text vectors are cached by content hash,
//! and similarity is plain cosine.

pub mod cache;
pub mod engine;
pub mod providers;
pub mod similarity;

pub use cache::{CachePolicy, CacheStats, EmbeddingCache, VectorKey};
pub use engine::EmbeddingEngine;
pub use providers::{create_source, HashingEmbeddingSource};
pub use similarity::cosine_similarity;
