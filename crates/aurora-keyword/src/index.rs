//! KeywordIndex: the two BM25 lifecycles.
//!
//! - Ephemeral: built on demand over one query's candidate set.
//! - Persistent: a corpus-wide index backed by a snapshot file. Construction
//!   does no I/O; the first `retrieve` loads the snapshot, and a missing,
//!   unreadable or stale snapshot is rebuilt from the store and re-persisted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use aurora_core::chunk::Chunk;
use aurora_core::config::defaults::SNAPSHOT_SUFFIX;
use aurora_core::config::KeywordConfig;
use aurora_core::errors::{AuroraError, AuroraResult, StorageError};
use aurora_core::traits::IChunkStore;

use crate::bm25::Bm25Index;
use crate::snapshot::{self, IndexSnapshot};

/// A BM25 index in one of its two lifecycles.
pub struct KeywordIndex {
    config: KeywordConfig,
    mode: Mode,
}

enum Mode {
    Ephemeral(Arc<Bm25Index>),
    Persistent {
        path: PathBuf,
        state: Mutex<PersistentState>,
    },
}

#[derive(Default)]
struct PersistentState {
    loaded: Option<Loaded>,
    loads: usize,
}

struct Loaded {
    fingerprint: String,
    index: Arc<Bm25Index>,
}

impl KeywordIndex {
    /// Build immediately over a candidate set.
    pub fn for_candidates(chunks: &[Chunk], config: &KeywordConfig) -> Self {
        Self {
            config: config.clone(),
            mode: Mode::Ephemeral(Arc::new(Bm25Index::from_chunks(chunks, config))),
        }
    }

    /// A persisted index at `path`. Nothing is read until the first retrieval.
    pub fn persistent(path: impl Into<PathBuf>, config: &KeywordConfig) -> Self {
        Self {
            config: config.clone(),
            mode: Mode::Persistent {
                path: path.into(),
                state: Mutex::new(PersistentState::default()),
            },
        }
    }

    /// Default snapshot location for a database path.
    pub fn default_snapshot_path(db_path: &Path) -> PathBuf {
        let mut name = db_path.as_os_str().to_os_string();
        name.push(SNAPSHOT_SUFFIX);
        PathBuf::from(name)
    }

    pub fn config(&self) -> &KeywordConfig {
        &self.config
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self.mode, Mode::Persistent { .. })
    }

    /// Snapshot location, for the persistent lifecycle.
    pub fn snapshot_path(&self) -> Option<&Path> {
        match &self.mode {
            Mode::Persistent { path, .. } => Some(path),
            Mode::Ephemeral(_) => None,
        }
    }

    /// Whether an index is in memory. Always true for ephemeral indexes.
    pub fn is_loaded(&self) -> bool {
        match &self.mode {
            Mode::Ephemeral(_) => true,
            Mode::Persistent { state, .. } => {
                state.lock().map(|s| s.loaded.is_some()).unwrap_or(false)
            }
        }
    }

    /// How many times the persistent index was loaded or rebuilt.
    pub fn load_count(&self) -> usize {
        match &self.mode {
            Mode::Ephemeral(_) => 0,
            Mode::Persistent { state, .. } => state.lock().map(|s| s.loads).unwrap_or(0),
        }
    }

    /// Drop the in-memory copy. The next retrieval reloads.
    pub fn invalidate(&self) {
        if let Mode::Persistent { state, .. } = &self.mode {
            if let Ok(mut s) = state.lock() {
                s.loaded = None;
            }
        }
    }

    /// Top `limit` `(chunk_id, bm25)` hits for `query`.
    ///
    /// The persistent lifecycle checks the store's corpus fingerprint and
    /// reloads or rebuilds when it changed.
    pub fn retrieve(
        &self,
        store: &dyn IChunkStore,
        query: &str,
        limit: usize,
    ) -> AuroraResult<Vec<(String, f64)>> {
        let index = self.current(store)?;
        Ok(index.search(query, limit))
    }

    /// BM25 scores for every matching document.
    pub fn scores(&self, store: &dyn IChunkStore, query: &str) -> AuroraResult<HashMap<String, f64>> {
        let index = self.current(store)?;
        Ok(index.score_all(query))
    }

    /// The ephemeral index, if this is one.
    pub fn ephemeral(&self) -> Option<&Bm25Index> {
        match &self.mode {
            Mode::Ephemeral(index) => Some(index.as_ref()),
            Mode::Persistent { .. } => None,
        }
    }

    fn current(&self, store: &dyn IChunkStore) -> AuroraResult<Arc<Bm25Index>> {
        match &self.mode {
            Mode::Ephemeral(index) => Ok(Arc::clone(index)),
            Mode::Persistent { path, state } => {
                let fingerprint = store.corpus_fingerprint()?;
                let mut state = state.lock().map_err(|e| {
                    AuroraError::Storage(StorageError::PoolLockPoisoned {
                        details: e.to_string(),
                    })
                })?;
                if let Some(loaded) = &state.loaded {
                    if loaded.fingerprint == fingerprint {
                        return Ok(Arc::clone(&loaded.index));
                    }
                    debug!(path = %path.display(), "keyword index stale, reloading");
                }

                let index = self.load_or_rebuild(path, store, &fingerprint)?;
                state.loads += 1;
                state.loaded = Some(Loaded {
                    fingerprint,
                    index: Arc::clone(&index),
                });
                Ok(index)
            }
        }
    }

    fn load_or_rebuild(
        &self,
        path: &Path,
        store: &dyn IChunkStore,
        fingerprint: &str,
    ) -> AuroraResult<Arc<Bm25Index>> {
        match snapshot::load(path) {
            Ok(Some(snap))
                if snap.fingerprint == fingerprint && snap.index.matches_config(&self.config) =>
            {
                debug!(path = %path.display(), docs = snap.index.len(), "keyword snapshot loaded");
                return Ok(Arc::new(snap.index));
            }
            Ok(Some(_)) => debug!(path = %path.display(), "keyword snapshot stale"),
            Ok(None) => debug!(path = %path.display(), "keyword snapshot absent"),
            Err(e) => warn!(path = %path.display(), error = %e, "keyword snapshot unreadable, rebuilding"),
        }

        let chunks = store.all_chunks()?;
        let index = Bm25Index::from_chunks(&chunks, &self.config);
        info!(
            path = %path.display(),
            docs = index.len(),
            terms = index.term_count(),
            "keyword index rebuilt"
        );

        let snap = IndexSnapshot::new(fingerprint.to_string(), index);
        if let Err(e) = snapshot::save(path, &snap) {
            warn!(path = %path.display(), error = %e, "failed to persist keyword snapshot");
        }
        Ok(Arc::new(snap.index))
    }
}
