//! HybridRetriever: candidate gathering, three sub-scores, fusion.
//!
//! Construction is free. The store's full-text capability, the activation
//! engine and the persisted keyword index are all resolved on first use.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use chrono::Utc;
use tracing::{debug, info, warn};

use aurora_activation::{get_cached_engine, ActivationEngine};
use aurora_core::chunk::{Chunk, StoreIdentity};
use aurora_core::config::{ActivationConfig, AuroraConfig, KeywordConfig, RetrievalConfig};
use aurora_core::errors::AuroraResult;
use aurora_core::traits::{IChunkStore, IEmbeddingSource};
use aurora_embeddings::{cosine_similarity, create_source, CachePolicy, EmbeddingEngine};
use aurora_keyword::KeywordIndex;
use aurora_storage::ChunkStore;

use crate::ranking::{fuse, FusionWeights, SignalScores};
use crate::results::RankedResult;
use crate::search;
use crate::signals::ActiveSignals;
use crate::{index_span, retrieval_span};

pub struct HybridRetriever {
    store: Arc<dyn IChunkStore>,
    embeddings: Option<EmbeddingEngine>,
    config: RetrievalConfig,
    activation_config: ActivationConfig,
    weights: FusionWeights,
    signals: ActiveSignals,
    keyword_index: Option<KeywordIndex>,
    full_text: OnceLock<bool>,
    activation: OnceLock<Arc<ActivationEngine>>,
}

impl HybridRetriever {
    /// A retriever over `store`. Performs no database, index or model work.
    pub fn new(
        store: Arc<dyn IChunkStore>,
        embedding: Option<Arc<dyn IEmbeddingSource>>,
        config: RetrievalConfig,
    ) -> Self {
        Self::build(
            store,
            embedding,
            config,
            ActivationConfig::default(),
            CachePolicy::default(),
        )
    }

    /// Open the configured SQLite store and build a retriever over it.
    pub fn open(config: &AuroraConfig) -> AuroraResult<Self> {
        let store = ChunkStore::open_with_config(config.storage.clone());
        Self::from_config(Arc::new(store), config)
    }

    /// A retriever wired from a full configuration: embedding provider,
    /// activation settings and vector cache policy included.
    pub fn from_config(store: Arc<dyn IChunkStore>, config: &AuroraConfig) -> AuroraResult<Self> {
        let source = create_source(&config.embedding)?;
        Ok(Self::build(
            store,
            source,
            config.retrieval.clone(),
            config.activation.clone(),
            CachePolicy::from_config(&config.embedding),
        ))
    }

    /// Activation settings used if this retriever is the first to ask the
    /// registry for the store's engine.
    pub fn with_activation_config(mut self, config: ActivationConfig) -> Self {
        self.activation_config = config;
        self
    }

    fn build(
        store: Arc<dyn IChunkStore>,
        embedding: Option<Arc<dyn IEmbeddingSource>>,
        config: RetrievalConfig,
        activation_config: ActivationConfig,
        cache_policy: CachePolicy,
    ) -> Self {
        let signals = ActiveSignals::resolve(&config, embedding.as_deref());
        if signals.semantic {
            info!("hybrid retrieval: keyword + activation + semantic");
        } else {
            let reason = match &embedding {
                None => "no embedding source",
                Some(_) if config.semantic_weight <= 0.0 => "semantic weight is zero",
                Some(_) => "embedding source unavailable",
            };
            info!(reason, "dual-hybrid fallback: keyword + activation");
        }

        let embeddings = embedding
            .filter(|_| signals.semantic)
            .map(|source| EmbeddingEngine::new(source, cache_policy));
        let keyword_index = persistent_index(&store.identity(), &config.keyword);

        Self {
            store,
            embeddings,
            weights: FusionWeights::from_config(&config),
            config,
            activation_config,
            signals,
            keyword_index,
            full_text: OnceLock::new(),
            activation: OnceLock::new(),
        }
    }

    pub fn active_signals(&self) -> ActiveSignals {
        self.signals
    }

    /// The persisted corpus-wide keyword index, if one is configured.
    pub fn keyword_index(&self) -> Option<&KeywordIndex> {
        self.keyword_index.as_ref()
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn IChunkStore> {
        &self.store
    }

    /// Retrieve with the configured default result count.
    pub fn retrieve_default(&self, query: &str) -> AuroraResult<Vec<RankedResult>> {
        self.retrieve(query, self.config.default_top_k, None)
    }

    /// The `top_k` most relevant chunks for `query`.
    ///
    /// `min_semantic_score` drops candidates whose raw cosine similarity is
    /// below it. It only applies while the semantic signal is active.
    pub fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        min_semantic_score: Option<f64>,
    ) -> AuroraResult<Vec<RankedResult>> {
        let span = retrieval_span!(query, top_k);
        let _guard = span.enter();

        if query.trim().is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let full_text = self.full_text_capability()?;
        let candidates = search::gather(
            self.store.as_ref(),
            query,
            &self.config,
            full_text,
            self.keyword_index.as_ref(),
        )?;
        if candidates.is_empty() {
            debug!("no candidates");
            return Ok(Vec::new());
        }
        let source = candidates.source;
        let candidate_count = candidates.len();

        let raw = self.score(query, &candidates.chunks)?;
        let threshold = match (min_semantic_score, raw.semantic.is_some()) {
            (Some(min), true) => Some(min),
            (Some(min), false) => {
                debug!(min, "semantic threshold ignored, semantic signal inactive");
                None
            }
            (None, _) => None,
        };

        let results = fuse(candidates.chunks, &raw, &self.weights, threshold, top_k);
        info!(
            candidates = candidate_count,
            ?source,
            semantic = raw.semantic.is_some(),
            results = results.len(),
            "retrieval complete"
        );
        Ok(results)
    }

    fn score(&self, query: &str, chunks: &[Chunk]) -> AuroraResult<SignalScores> {
        let bm25 = if self.signals.keyword {
            self.keyword_scores(query, chunks)?
        } else {
            vec![0.0; chunks.len()]
        };
        let activation = if self.signals.activation {
            self.activation_scores(chunks)?
        } else {
            vec![0.0; chunks.len()]
        };
        let semantic = self
            .embeddings
            .as_ref()
            .and_then(|engine| semantic_scores(engine, query, chunks));
        Ok(SignalScores {
            bm25,
            activation,
            semantic,
        })
    }

    fn keyword_scores(&self, query: &str, chunks: &[Chunk]) -> AuroraResult<Vec<f64>> {
        let _span = index_span!("candidates", chunks.len()).entered();
        let index = KeywordIndex::for_candidates(chunks, &self.config.keyword);
        let scores = index.scores(self.store.as_ref(), query)?;
        Ok(chunks
            .iter()
            .map(|c| scores.get(&c.id).copied().unwrap_or(0.0))
            .collect())
    }

    fn activation_scores(&self, chunks: &[Chunk]) -> AuroraResult<Vec<f64>> {
        let engine = self.activation_engine()?;
        let ids: Vec<String> = chunks.iter().map(|c| c.id.clone()).collect();
        let stats = self.store.get_access_stats_batch(&ids)?;
        let now = Utc::now();
        Ok(chunks
            .iter()
            .map(|c| match stats.get(&c.id) {
                Some(s) => engine.activation_score(s, c.chunk_type, now),
                None => engine.config().min_activation,
            })
            .collect())
    }

    fn full_text_capability(&self) -> AuroraResult<bool> {
        if let Some(&enabled) = self.full_text.get() {
            return Ok(enabled);
        }
        let enabled = self.store.supports_full_text()?;
        if !enabled {
            info!("store has no full-text search, using activation and keyword-index candidates");
        }
        Ok(*self.full_text.get_or_init(|| enabled))
    }

    fn activation_engine(&self) -> AuroraResult<Arc<ActivationEngine>> {
        if let Some(engine) = self.activation.get() {
            return Ok(Arc::clone(engine));
        }
        let engine = get_cached_engine(self.store.as_ref(), &self.activation_config)?;
        Ok(Arc::clone(self.activation.get_or_init(|| engine)))
    }
}

/// Cosine similarity of every chunk to the query. `None` degrades the call
/// to keyword + activation.
fn semantic_scores(engine: &EmbeddingEngine, query: &str, chunks: &[Chunk]) -> Option<Vec<f64>> {
    let query_vec = match engine.embed_query(query) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "query embedding failed, degrading to keyword + activation");
            return None;
        }
    };
    match engine.chunk_vectors(chunks) {
        Ok(vectors) => Some(
            vectors
                .iter()
                .map(|v| cosine_similarity(&query_vec, v))
                .collect(),
        ),
        Err(e) => {
            warn!(error = %e, "chunk embedding failed, degrading to keyword + activation");
            None
        }
    }
}

fn persistent_index(identity: &StoreIdentity, config: &KeywordConfig) -> Option<KeywordIndex> {
    if !config.persist {
        return None;
    }
    let path = match (&config.snapshot_path, identity) {
        (Some(path), _) => PathBuf::from(path),
        (None, StoreIdentity::File(db_path)) => KeywordIndex::default_snapshot_path(db_path),
        (None, StoreIdentity::InMemory) => {
            debug!("in-memory store without a snapshot path, keyword index not persisted");
            return None;
        }
    };
    Some(KeywordIndex::persistent(path, config))
}
