//! Candidate gathering.
//!
//! Full-text search is preferred. When the store has no full-text path, or
//! it finds nothing, candidates are the most activated chunks plus the top
//! hits of the persisted keyword index, so a keyword match with low
//! activation is still recalled.

use std::collections::HashSet;

use tracing::debug;

use aurora_core::chunk::Chunk;
use aurora_core::config::RetrievalConfig;
use aurora_core::errors::AuroraResult;
use aurora_core::traits::IChunkStore;
use aurora_keyword::KeywordIndex;

/// Where a candidate set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    FullText,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct CandidateSet {
    pub chunks: Vec<Chunk>,
    pub source: CandidateSource,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Collect the candidates for `query`.
///
/// `full_text` is the store's cached capability. `keyword_index` is the
/// persisted corpus-wide index, if one is configured.
pub fn gather(
    store: &dyn IChunkStore,
    query: &str,
    config: &RetrievalConfig,
    full_text: bool,
    keyword_index: Option<&KeywordIndex>,
) -> AuroraResult<CandidateSet> {
    if full_text {
        if let Some(hits) = store.retrieve_by_fts(query, config.candidate_limit)? {
            if !hits.is_empty() {
                debug!(candidates = hits.len(), "full-text candidates");
                return Ok(CandidateSet {
                    chunks: hits,
                    source: CandidateSource::FullText,
                });
            }
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut chunks: Vec<Chunk> = Vec::new();

    for chunk in store.retrieve_by_activation(f64::MIN, config.activation_candidates, None)? {
        if seen.insert(chunk.id.clone()) {
            chunks.push(chunk);
        }
    }
    let by_activation = chunks.len();

    if let Some(index) = keyword_index {
        for (id, _) in index.retrieve(store, query, config.keyword_candidates)? {
            if seen.contains(&id) {
                continue;
            }
            // The snapshot can briefly name a chunk deleted since it was built.
            if let Some(chunk) = store.get_chunk(&id)? {
                seen.insert(id);
                chunks.push(chunk);
            }
        }
    }

    debug!(
        by_activation,
        by_keyword = chunks.len() - by_activation,
        "fallback candidates"
    );
    Ok(CandidateSet {
        chunks,
        source: CandidateSource::Fallback,
    })
}
