//! EmbeddingEngine: a source plus its vector cache.
//!
//! Query vectors and chunk-text vectors share one [`EmbeddingCache`]. A
//! chunk's stored embedding is used as-is when its dimensionality matches
//! the source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use aurora_core::chunk::Chunk;
use aurora_core::config::EmbeddingConfig;
use aurora_core::errors::AuroraResult;
use aurora_core::traits::IEmbeddingSource;

use crate::cache::{CachePolicy, EmbeddingCache, VectorKey};
use crate::providers::create_source;
use crate::similarity::validate_dimensions;

pub struct EmbeddingEngine {
    source: Arc<dyn IEmbeddingSource>,
    cache: EmbeddingCache,
    source_calls: AtomicUsize,
}

impl EmbeddingEngine {
    pub fn new(source: Arc<dyn IEmbeddingSource>, policy: CachePolicy) -> Self {
        info!(
            provider = source.name(),
            dims = source.dimensions(),
            cache_size = policy.max_entries,
            "EmbeddingEngine initialized"
        );
        let cache = EmbeddingCache::new(policy, source.dimensions());
        Self {
            source,
            cache,
            source_calls: AtomicUsize::new(0),
        }
    }

    /// Engine for the configured provider, or `None` when embeddings are off.
    pub fn from_config(config: &EmbeddingConfig) -> AuroraResult<Option<Self>> {
        let policy = CachePolicy::from_config(config);
        Ok(create_source(config)?.map(|source| Self::new(source, policy)))
    }

    pub fn source(&self) -> &Arc<dyn IEmbeddingSource> {
        &self.source
    }

    pub fn dimensions(&self) -> usize {
        self.source.dimensions()
    }

    pub fn is_available(&self) -> bool {
        self.source.is_available()
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Number of texts handed to the underlying source so far.
    pub fn source_calls(&self) -> usize {
        self.source_calls.load(Ordering::Relaxed)
    }

    /// Embed a query, through the cache.
    pub fn embed_query(&self, query: &str) -> AuroraResult<Vec<f32>> {
        self.embed_text(VectorKey::for_query(query), query)
    }

    /// The vector for a chunk: its stored embedding when the dimensions
    /// match, otherwise the (cached) embedding of its searchable text.
    pub fn chunk_vector(&self, chunk: &Chunk) -> AuroraResult<Vec<f32>> {
        if let Some(stored) = self.usable_stored(chunk) {
            return Ok(stored.to_vec());
        }
        self.embed_text(VectorKey::for_chunk(chunk), &chunk.searchable_text())
    }

    /// Vectors for many chunks, batching every cache miss into one source call.
    pub fn chunk_vectors(&self, chunks: &[Chunk]) -> AuroraResult<Vec<Vec<f32>>> {
        let mut out: Vec<Option<Vec<f32>>> = Vec::with_capacity(chunks.len());
        let mut missing: Vec<(usize, VectorKey, String)> = Vec::new();

        for (i, chunk) in chunks.iter().enumerate() {
            if let Some(stored) = self.usable_stored(chunk) {
                out.push(Some(stored.to_vec()));
                continue;
            }
            let key = VectorKey::for_chunk(chunk);
            match self.cache.get(&key) {
                Some(hit) => out.push(Some(hit)),
                None => {
                    out.push(None);
                    missing.push((i, key, chunk.searchable_text()));
                }
            }
        }

        if !missing.is_empty() {
            let texts: Vec<String> = missing.iter().map(|(_, _, t)| t.clone()).collect();
            self.source_calls.fetch_add(texts.len(), Ordering::Relaxed);
            let vectors = self.source.embed_batch(&texts)?;
            let stats = self.cache.stats();
            debug!(
                embedded = vectors.len(),
                cache_hits = stats.hits,
                cache_misses = stats.misses,
                "embedded chunk texts"
            );
            for ((i, key, _), vector) in missing.into_iter().zip(vectors) {
                validate_dimensions(&vector, self.dimensions())?;
                self.cache.insert(key, &vector);
                out[i] = Some(vector);
            }
        }

        Ok(out.into_iter().map(Option::unwrap_or_default).collect())
    }

    fn usable_stored<'a>(&self, chunk: &'a Chunk) -> Option<&'a [f32]> {
        match chunk.embedding.as_deref() {
            Some(stored) if stored.len() == self.dimensions() => Some(stored),
            Some(stored) => {
                debug!(
                    chunk_id = %chunk.id,
                    stored = stored.len(),
                    expected = self.dimensions(),
                    "stored embedding dimension differs, embedding text instead"
                );
                None
            }
            None => None,
        }
    }

    fn embed_text(&self, key: VectorKey, text: &str) -> AuroraResult<Vec<f32>> {
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        self.source_calls.fetch_add(1, Ordering::Relaxed);
        let vector = self.source.embed(text)?;
        validate_dimensions(&vector, self.dimensions())?;
        self.cache.insert(key, &vector);
        Ok(vector)
    }
}

/// The engine is itself a source, with caching in front.
impl IEmbeddingSource for EmbeddingEngine {
    fn embed(&self, text: &str) -> AuroraResult<Vec<f32>> {
        self.embed_query(text)
    }

    fn dimensions(&self) -> usize {
        self.source.dimensions()
    }

    fn name(&self) -> &str {
        self.source.name()
    }

    fn is_available(&self) -> bool {
        self.source.is_available()
    }
}
