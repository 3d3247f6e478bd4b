//! ChunkStore: lazily-initialized SQLite store behind [`IChunkStore`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::{debug, info};

use aurora_core::chunk::{
    AccessStats, ActivationRecord, Chunk, ChunkType, Relationship, StoreIdentity,
};
use aurora_core::config::StorageConfig;
use aurora_core::errors::{AuroraError, AuroraResult, StorageError};
use aurora_core::traits::IChunkStore;

use crate::location::StoreLocation;
use crate::migrations;
use crate::pool::{ConnectionPool, PooledConnection};
use crate::queries::{activation_ops, chunk_crud, chunk_search, maintenance, relationship_ops};

/// Optional features resolved once at first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCapabilities {
    /// The `chunks_fts` table exists and writes must maintain it.
    pub fts_table: bool,
    /// Full-text search is enabled for reads.
    pub fts_search: bool,
}

/// SQLite-backed chunk store.
///
/// Opening is free: no file is touched until the first real operation,
/// which runs migrations and detects capabilities exactly once.
pub struct ChunkStore {
    location: StoreLocation,
    config: StorageConfig,
    pool: Arc<ConnectionPool>,
    /// Keeps an in-memory database alive even if the pool is cleared.
    anchor: Mutex<Option<PooledConnection>>,
    capabilities: Mutex<Option<StoreCapabilities>>,
}

impl ChunkStore {
    /// Open a file-backed store (or `:memory:`) with default storage config.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let config = StorageConfig {
            db_path: path.as_ref().display().to_string(),
            ..StorageConfig::default()
        };
        Self::open_with_config(config)
    }

    /// Open the store described by `config.db_path`.
    pub fn open_with_config(config: StorageConfig) -> Self {
        let location = StoreLocation::resolve(Path::new(&config.db_path));
        Self::with_pool(location, config, ConnectionPool::global())
    }

    /// A fresh, private in-memory store.
    pub fn open_in_memory() -> Self {
        Self::with_pool(
            StoreLocation::memory(),
            StorageConfig::default(),
            ConnectionPool::global(),
        )
    }

    /// Open against an explicit pool. Tests use this to observe pool behaviour.
    pub fn with_pool(location: StoreLocation, config: StorageConfig, pool: Arc<ConnectionPool>) -> Self {
        Self {
            location,
            config,
            pool,
            anchor: Mutex::new(None),
            capabilities: Mutex::new(None),
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// Whether schema init and capability detection have run.
    pub fn is_initialized(&self) -> bool {
        self.capabilities.lock().map(|c| c.is_some()).unwrap_or(false)
    }

    /// Capabilities, initializing the store if needed.
    pub fn capabilities(&self) -> AuroraResult<StoreCapabilities> {
        self.ensure_initialized()
    }

    /// Forget initialization state and drop this location's pooled
    /// connections. The next operation re-runs migrations and capability detection.
    pub fn reinitialize(&self) -> AuroraResult<()> {
        *lock(&self.capabilities)? = None;
        let dropped = self.pool.clear_location(&self.location)?;
        debug!(location = %self.location.describe(), dropped, "store reinitialization requested");
        Ok(())
    }

    /// Run `f` on this thread's connection, initializing the store first.
    pub fn with_conn<F, T>(&self, f: F) -> AuroraResult<T>
    where
        F: FnOnce(&Connection) -> AuroraResult<T>,
    {
        self.ensure_initialized()?;
        self.with_raw_conn(f)
    }

    /// Check database integrity.
    pub fn integrity_check(&self) -> AuroraResult<bool> {
        self.with_conn(maintenance::integrity_check)
    }

    /// Reclaim free pages.
    pub fn vacuum(&self) -> AuroraResult<()> {
        self.with_conn(maintenance::full_vacuum)
    }

    fn with_raw_conn<F, T>(&self, f: F) -> AuroraResult<T>
    where
        F: FnOnce(&Connection) -> AuroraResult<T>,
    {
        let conn = self.connection()?;
        let guard = lock(&conn)?;
        f(&guard)
    }

    fn connection(&self) -> AuroraResult<PooledConnection> {
        if !self.location.is_memory() {
            return self.pool.acquire(&self.location, &self.config);
        }
        let mut anchor = lock(&self.anchor)?;
        if let Some(conn) = anchor.as_ref() {
            return Ok(Arc::clone(conn));
        }
        let conn = self.pool.acquire(&self.location, &self.config)?;
        *anchor = Some(Arc::clone(&conn));
        Ok(conn)
    }

    /// Lazy init: migrations plus capability detection, once per store.
    /// Concurrent first callers serialize on the capabilities lock.
    fn ensure_initialized(&self) -> AuroraResult<StoreCapabilities> {
        let mut caps = lock(&self.capabilities)?;
        if let Some(c) = *caps {
            return Ok(c);
        }

        let wanted = self.config.full_text_search;
        let resolved = self.with_raw_conn(|conn| {
            migrations::run_migrations(conn)?;
            let fts_table = migrations::ensure_full_text(conn, wanted)?;
            Ok(StoreCapabilities {
                fts_table,
                fts_search: fts_table && wanted,
            })
        })?;

        info!(
            location = %self.location.describe(),
            fts = resolved.fts_search,
            "chunk store initialized"
        );
        *caps = Some(resolved);
        Ok(resolved)
    }
}

fn lock<T>(m: &Mutex<T>) -> AuroraResult<MutexGuard<'_, T>> {
    m.lock().map_err(|e| {
        AuroraError::Storage(StorageError::PoolLockPoisoned {
            details: e.to_string(),
        })
    })
}

impl IChunkStore for ChunkStore {
    fn identity(&self) -> StoreIdentity {
        self.location.identity()
    }

    fn save_chunk(&self, chunk: &Chunk) -> AuroraResult<()> {
        let caps = self.ensure_initialized()?;
        self.with_raw_conn(|conn| chunk_crud::upsert_chunk(conn, chunk, None, caps.fts_table))
    }

    fn save_chunk_seeded(&self, chunk: &Chunk, base_level: f64) -> AuroraResult<()> {
        let caps = self.ensure_initialized()?;
        self.with_raw_conn(|conn| {
            chunk_crud::upsert_chunk(conn, chunk, Some(base_level), caps.fts_table)
        })
    }

    fn get_chunk(&self, id: &str) -> AuroraResult<Option<Chunk>> {
        self.with_conn(|conn| chunk_crud::get_chunk(conn, id))
    }

    fn delete_chunk(&self, id: &str) -> AuroraResult<bool> {
        self.with_conn(|conn| chunk_crud::delete_chunk(conn, id))
    }

    fn all_chunks(&self) -> AuroraResult<Vec<Chunk>> {
        self.with_conn(chunk_crud::all_chunks)
    }

    fn chunk_count(&self) -> AuroraResult<usize> {
        self.with_conn(chunk_crud::chunk_count)
    }

    fn corpus_fingerprint(&self) -> AuroraResult<String> {
        self.with_conn(chunk_crud::corpus_fingerprint)
    }

    fn retrieve_by_activation(
        &self,
        min_activation: f64,
        limit: usize,
        type_filter: Option<ChunkType>,
    ) -> AuroraResult<Vec<Chunk>> {
        self.with_conn(|conn| {
            chunk_search::retrieve_by_activation(conn, min_activation, limit, type_filter)
        })
    }

    fn supports_full_text(&self) -> AuroraResult<bool> {
        Ok(self.ensure_initialized()?.fts_search)
    }

    fn retrieve_by_fts(&self, query: &str, limit: usize) -> AuroraResult<Option<Vec<Chunk>>> {
        if !self.ensure_initialized()?.fts_search {
            return Ok(None);
        }
        self.with_raw_conn(|conn| chunk_search::search_fts(conn, query, limit))
            .map(Some)
    }

    fn update_activation(&self, chunk_id: &str, delta: f64) -> AuroraResult<()> {
        self.with_conn(|conn| activation_ops::update_activation(conn, chunk_id, delta))
    }

    fn get_activation(&self, chunk_id: &str) -> AuroraResult<Option<ActivationRecord>> {
        self.with_conn(|conn| activation_ops::get_activation(conn, chunk_id))
    }

    fn get_access_stats_batch(&self, ids: &[String]) -> AuroraResult<HashMap<String, AccessStats>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.with_conn(|conn| activation_ops::get_access_stats_batch(conn, ids))
    }

    fn add_relationship(&self, relationship: &Relationship) -> AuroraResult<i64> {
        self.with_conn(|conn| relationship_ops::add_relationship(conn, relationship))
    }

    fn get_relationships(&self, chunk_id: &str) -> AuroraResult<Vec<Relationship>> {
        self.with_conn(|conn| relationship_ops::get_relationships(conn, chunk_id))
    }
}
