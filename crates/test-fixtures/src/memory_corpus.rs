//! A minimal map-backed `IChunkStore` for crates that sit below storage.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use chrono::Utc;

use aurora_core::chunk::{
    AccessStats, ActivationRecord, Chunk, ChunkType, Relationship, StoreIdentity,
};
use aurora_core::constants::DEFAULT_BASE_LEVEL;
use aurora_core::errors::{AuroraError, AuroraResult};
use aurora_core::traits::IChunkStore;

/// Map-backed store without full-text search. Counts corpus scans.
#[derive(Default)]
pub struct MemoryCorpus {
    chunks: RwLock<BTreeMap<String, Chunk>>,
    activations: RwLock<HashMap<String, ActivationRecord>>,
    relationships: RwLock<Vec<Relationship>>,
    revision: AtomicUsize,
    scans: AtomicUsize,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunks(chunks: &[Chunk]) -> Self {
        let corpus = Self::new();
        for c in chunks {
            corpus.save_chunk(c).expect("memory corpus save");
        }
        corpus
    }

    /// Number of `all_chunks` calls so far.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl IChunkStore for MemoryCorpus {
    fn identity(&self) -> StoreIdentity {
        StoreIdentity::InMemory
    }

    fn save_chunk(&self, chunk: &Chunk) -> AuroraResult<()> {
        self.save_chunk_seeded(chunk, DEFAULT_BASE_LEVEL)
    }

    fn save_chunk_seeded(&self, chunk: &Chunk, base_level: f64) -> AuroraResult<()> {
        chunk.validate()?;
        self.chunks
            .write()
            .expect("lock")
            .insert(chunk.id.clone(), chunk.clone());
        self.activations
            .write()
            .expect("lock")
            .entry(chunk.id.clone())
            .and_modify(|a| {
                a.base_level = base_level;
                a.last_access = Utc::now();
            })
            .or_insert_with(|| ActivationRecord {
                chunk_id: chunk.id.clone(),
                base_level,
                last_access: Utc::now(),
                access_count: 1,
            });
        self.revision.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get_chunk(&self, id: &str) -> AuroraResult<Option<Chunk>> {
        Ok(self.chunks.read().expect("lock").get(id).cloned())
    }

    fn delete_chunk(&self, id: &str) -> AuroraResult<bool> {
        let existed = self.chunks.write().expect("lock").remove(id).is_some();
        self.activations.write().expect("lock").remove(id);
        self.relationships
            .write()
            .expect("lock")
            .retain(|r| r.from_chunk != id && r.to_chunk != id);
        self.revision.fetch_add(1, Ordering::SeqCst);
        Ok(existed)
    }

    fn all_chunks(&self) -> AuroraResult<Vec<Chunk>> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        Ok(self.chunks.read().expect("lock").values().cloned().collect())
    }

    fn chunk_count(&self) -> AuroraResult<usize> {
        Ok(self.chunks.read().expect("lock").len())
    }

    fn corpus_fingerprint(&self) -> AuroraResult<String> {
        let n = self.chunks.read().expect("lock").len();
        Ok(format!("{n}:{}", self.revision.load(Ordering::SeqCst)))
    }

    fn retrieve_by_activation(
        &self,
        min_activation: f64,
        limit: usize,
        type_filter: Option<ChunkType>,
    ) -> AuroraResult<Vec<Chunk>> {
        let chunks = self.chunks.read().expect("lock");
        let acts = self.activations.read().expect("lock");
        let mut hits: Vec<(&Chunk, f64)> = chunks
            .values()
            .filter(|c| type_filter.map_or(true, |t| c.chunk_type == t))
            .filter_map(|c| acts.get(&c.id).map(|a| (c, a.base_level)))
            .filter(|(_, b)| *b >= min_activation)
            .collect();
        hits.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));
        Ok(hits.into_iter().take(limit).map(|(c, _)| c.clone()).collect())
    }

    fn supports_full_text(&self) -> AuroraResult<bool> {
        Ok(false)
    }

    fn retrieve_by_fts(&self, _query: &str, _limit: usize) -> AuroraResult<Option<Vec<Chunk>>> {
        Ok(None)
    }

    fn update_activation(&self, chunk_id: &str, delta: f64) -> AuroraResult<()> {
        let mut acts = self.activations.write().expect("lock");
        let a = acts.get_mut(chunk_id).ok_or_else(|| AuroraError::ChunkNotFound {
            id: chunk_id.to_string(),
        })?;
        a.base_level += delta;
        a.access_count += 1;
        a.last_access = Utc::now();
        Ok(())
    }

    fn get_activation(&self, chunk_id: &str) -> AuroraResult<Option<ActivationRecord>> {
        Ok(self.activations.read().expect("lock").get(chunk_id).cloned())
    }

    fn get_access_stats_batch(&self, ids: &[String]) -> AuroraResult<HashMap<String, AccessStats>> {
        let chunks = self.chunks.read().expect("lock");
        let acts = self.activations.read().expect("lock");
        Ok(ids
            .iter()
            .filter_map(|id| {
                let a = acts.get(id)?;
                let c = chunks.get(id)?;
                Some((
                    id.clone(),
                    AccessStats {
                        access_count: a.access_count,
                        last_access: a.last_access,
                        first_access: c.created_at,
                        base_level: a.base_level,
                    },
                ))
            })
            .collect())
    }

    fn add_relationship(&self, relationship: &Relationship) -> AuroraResult<i64> {
        let mut rels = self.relationships.write().expect("lock");
        let id = rels.len() as i64 + 1;
        let mut r = relationship.clone();
        r.id = Some(id);
        rels.push(r);
        Ok(id)
    }

    fn get_relationships(&self, chunk_id: &str) -> AuroraResult<Vec<Relationship>> {
        Ok(self
            .relationships
            .read()
            .expect("lock")
            .iter()
            .filter(|r| r.from_chunk == chunk_id || r.to_chunk == chunk_id)
            .cloned()
            .collect())
    }
}
