//! Process-wide cache of activation engines keyed by store identity.
//!
//! Lifecycle: lazily populated on first lookup, cleared explicitly (tests).
//! Construction happens under the registry lock, so concurrent first callers
//! for one identity converge on a single instance. First writer wins: a
//! later lookup with a different config gets the existing engine.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use tracing::debug;

use aurora_core::chunk::StoreIdentity;
use aurora_core::config::ActivationConfig;
use aurora_core::errors::{AuroraError, AuroraResult, StorageError};
use aurora_core::traits::IChunkStore;

use crate::engine::ActivationEngine;

static GLOBAL_REGISTRY: LazyLock<EngineRegistry> = LazyLock::new(EngineRegistry::new);

/// Identity-keyed engine cache.
pub struct EngineRegistry {
    engines: Mutex<HashMap<StoreIdentity, Arc<ActivationEngine>>>,
    constructions: AtomicUsize,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self {
            engines: Mutex::new(HashMap::new()),
            constructions: AtomicUsize::new(0),
        }
    }

    /// The shared process-wide registry.
    pub fn global() -> &'static EngineRegistry {
        &GLOBAL_REGISTRY
    }

    /// The engine for `identity`, constructing it with `config` if absent.
    pub fn get_or_create(
        &self,
        identity: &StoreIdentity,
        config: &ActivationConfig,
    ) -> AuroraResult<Arc<ActivationEngine>> {
        let mut engines = self.lock()?;
        if let Some(engine) = engines.get(identity) {
            return Ok(Arc::clone(engine));
        }

        let engine = Arc::new(ActivationEngine::new(config.clone()));
        self.constructions.fetch_add(1, Ordering::SeqCst);
        debug!(identity = %identity, "activation engine constructed");
        engines.insert(identity.clone(), Arc::clone(&engine));
        Ok(engine)
    }

    /// The engine for a store's identity.
    pub fn get_for_store(
        &self,
        store: &dyn IChunkStore,
        config: &ActivationConfig,
    ) -> AuroraResult<Arc<ActivationEngine>> {
        self.get_or_create(&store.identity(), config)
    }

    /// Drop every cached engine. Returns how many were removed.
    pub fn clear(&self) -> AuroraResult<usize> {
        let mut engines = self.lock()?;
        let n = engines.len();
        engines.clear();
        Ok(n)
    }

    pub fn len(&self) -> usize {
        self.engines.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total engines ever constructed by this registry.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }

    fn lock(&self) -> AuroraResult<MutexGuard<'_, HashMap<StoreIdentity, Arc<ActivationEngine>>>> {
        self.engines.lock().map_err(|e| {
            AuroraError::Storage(StorageError::PoolLockPoisoned {
                details: e.to_string(),
            })
        })
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide engine for `store`.
pub fn get_cached_engine(
    store: &dyn IChunkStore,
    config: &ActivationConfig,
) -> AuroraResult<Arc<ActivationEngine>> {
    EngineRegistry::global().get_for_store(store, config)
}
