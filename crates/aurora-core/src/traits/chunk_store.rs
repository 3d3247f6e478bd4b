use std::collections::HashMap;

use crate::chunk::{AccessStats, ActivationRecord, Chunk, ChunkType, Relationship, StoreIdentity};
use crate::errors::AuroraResult;

/// Durable chunk storage with activation state and relationships.
pub trait IChunkStore: Send + Sync {
    /// Identity used to key process-wide caches.
    fn identity(&self) -> StoreIdentity;

    // --- Chunks ---
    /// Idempotent upsert. Creates or refreshes the activation seed row.
    fn save_chunk(&self, chunk: &Chunk) -> AuroraResult<()>;
    /// Upsert with an explicit initial base level.
    fn save_chunk_seeded(&self, chunk: &Chunk, base_level: f64) -> AuroraResult<()>;
    fn get_chunk(&self, id: &str) -> AuroraResult<Option<Chunk>>;
    /// Delete a chunk and everything that cascades from it. Returns whether it existed.
    fn delete_chunk(&self, id: &str) -> AuroraResult<bool>;
    fn all_chunks(&self) -> AuroraResult<Vec<Chunk>>;
    fn chunk_count(&self) -> AuroraResult<usize>;
    /// Changes whenever a chunk is added, removed, or updated.
    fn corpus_fingerprint(&self) -> AuroraResult<String>;

    // --- Retrieval ---
    /// Chunks with `base_level >= min_activation`, highest first.
    fn retrieve_by_activation(
        &self,
        min_activation: f64,
        limit: usize,
        type_filter: Option<ChunkType>,
    ) -> AuroraResult<Vec<Chunk>>;
    /// Whether the full-text path exists. Resolved once per store.
    fn supports_full_text(&self) -> AuroraResult<bool>;
    /// Full-text search. `Ok(None)` when the capability is absent.
    fn retrieve_by_fts(&self, query: &str, limit: usize) -> AuroraResult<Option<Vec<Chunk>>>;

    // --- Activation ---
    /// Add `delta` to the base level and record one access.
    fn update_activation(&self, chunk_id: &str, delta: f64) -> AuroraResult<()>;
    fn get_activation(&self, chunk_id: &str) -> AuroraResult<Option<ActivationRecord>>;
    fn get_access_stats_batch(&self, ids: &[String]) -> AuroraResult<HashMap<String, AccessStats>>;

    // --- Relationships ---
    fn add_relationship(&self, relationship: &Relationship) -> AuroraResult<i64>;
    fn get_relationships(&self, chunk_id: &str) -> AuroraResult<Vec<Relationship>>;
}
