//! Vector cache for one embedding source.
//!
//! Chunk vectors are keyed by [`Chunk::content_hash`], so re-indexing a
//! chunk with new text misses and unchanged chunks keep hitting across
//! retrievals. Query vectors live beside them under their own key kind.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use aurora_core::chunk::Chunk;
use aurora_core::config::defaults::{
    DEFAULT_EMBEDDING_CACHE_IDLE_SECS, DEFAULT_EMBEDDING_CACHE_SIZE,
    DEFAULT_EMBEDDING_CACHE_TTL_SECS,
};
use aurora_core::config::EmbeddingConfig;

/// What a cached vector was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VectorKey {
    /// A chunk's searchable text, by content hash.
    Chunk(String),
    /// A query string, by blake3 hash.
    Query(String),
}

impl VectorKey {
    pub fn for_chunk(chunk: &Chunk) -> Self {
        Self::Chunk(chunk.content_hash())
    }

    pub fn for_query(query: &str) -> Self {
        Self::Query(blake3::hash(query.as_bytes()).to_hex().to_string())
    }
}

/// Capacity and expiry of an [`EmbeddingCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_entries: u64,
    /// Evict after this long without a read.
    pub idle: Duration,
    /// Evict this long after insertion regardless of use.
    pub ttl: Duration,
}

impl CachePolicy {
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self {
            max_entries: config.cache_size,
            idle: Duration::from_secs(config.cache_idle_secs),
            ttl: Duration::from_secs(config.cache_ttl_secs),
        }
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            max_entries,
            ..Self::default()
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_EMBEDDING_CACHE_SIZE,
            idle: Duration::from_secs(DEFAULT_EMBEDDING_CACHE_IDLE_SECS),
            ttl: Duration::from_secs(DEFAULT_EMBEDDING_CACHE_TTL_SECS),
        }
    }
}

/// Hit and miss counts since construction or the last [`EmbeddingCache::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

/// Vectors of one fixed dimensionality.
#[derive(Clone)]
pub struct EmbeddingCache {
    vectors: Cache<VectorKey, Arc<[f32]>>,
    dimensions: usize,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl EmbeddingCache {
    pub fn new(policy: CachePolicy, dimensions: usize) -> Self {
        let vectors = Cache::builder()
            .max_capacity(policy.max_entries)
            .time_to_idle(policy.idle)
            .time_to_live(policy.ttl)
            .build();
        Self {
            vectors,
            dimensions,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn get(&self, key: &VectorKey) -> Option<Vec<f32>> {
        match self.vectors.get(key) {
            Some(v) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(v.to_vec())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a vector. Vectors of the wrong dimensionality are not cached.
    pub fn insert(&self, key: VectorKey, vector: &[f32]) -> bool {
        if vector.len() != self.dimensions {
            debug!(?key, len = vector.len(), expected = self.dimensions, "vector not cached");
            return false;
        }
        self.vectors.insert(key, Arc::from(vector));
        true
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// Entry count. moka applies writes lazily, so pending ones are flushed first.
    pub fn len(&self) -> u64 {
        self.vectors.run_pending_tasks();
        self.vectors.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.vectors.invalidate_all();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
