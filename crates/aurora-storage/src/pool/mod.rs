//! Process-wide connection registry.
//!
//! File-backed locations get one connection per (caller thread, location);
//! WAL lets those readers and the writer proceed concurrently. An in-memory
//! location gets exactly one connection, because every additional in-memory
//! connection would be a separate, empty database.
//!
//! Lifecycle: lazily populated on first use, first-writer-wins under the
//! registry lock. A thread's file connections are released when the thread
//! exits; everything else stays until explicitly cleared.

pub mod pragmas;

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, Weak};
use std::thread::ThreadId;

use rusqlite::Connection;
use tracing::debug;

use aurora_core::config::StorageConfig;
use aurora_core::errors::{AuroraError, AuroraResult, StorageError};

use crate::location::StoreLocation;

/// A connection shared between the registry and its users.
pub type PooledConnection = Arc<Mutex<Connection>>;

type ConnectionMap = Mutex<HashMap<PoolKey, PooledConnection>>;

static GLOBAL_POOL: LazyLock<Arc<ConnectionPool>> =
    LazyLock::new(|| Arc::new(ConnectionPool::new()));

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PoolKey {
    location: StoreLocation,
    /// `None` for in-memory locations.
    thread: Option<ThreadId>,
}

impl PoolKey {
    fn for_current_thread(location: &StoreLocation) -> Self {
        let thread = if location.is_memory() {
            None
        } else {
            Some(std::thread::current().id())
        };
        Self {
            location: location.clone(),
            thread,
        }
    }
}

thread_local! {
    static THREAD_LEASES: RefCell<ThreadLeases> = RefCell::new(ThreadLeases::default());
}

/// Pool entries registered by the current thread, removed when it exits.
#[derive(Default)]
struct ThreadLeases {
    held: Vec<(Weak<ConnectionMap>, PoolKey)>,
}

impl ThreadLeases {
    fn record(&mut self, map: &Arc<ConnectionMap>, key: &PoolKey) {
        let known = self
            .held
            .iter()
            .any(|(m, k)| k == key && std::ptr::eq(m.as_ptr(), Arc::as_ptr(map)));
        if !known {
            self.held.push((Arc::downgrade(map), key.clone()));
        }
    }
}

impl Drop for ThreadLeases {
    fn drop(&mut self) {
        let mut released = 0;
        for (map, key) in self.held.drain(..) {
            let Some(map) = map.upgrade() else { continue };
            if let Ok(mut connections) = map.lock() {
                released += usize::from(connections.remove(&key).is_some());
            };
        }
        if released > 0 {
            debug!(released, "thread exited, released pooled connections");
        }
    }
}

/// Registry of open connections keyed by (thread, location).
pub struct ConnectionPool {
    connections: Arc<ConnectionMap>,
    opened: AtomicUsize,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(HashMap::new())),
            opened: AtomicUsize::new(0),
        }
    }

    /// The shared process-wide pool.
    pub fn global() -> Arc<ConnectionPool> {
        Arc::clone(&GLOBAL_POOL)
    }

    /// Get the caller thread's connection for `location`, opening it on first use.
    pub fn acquire(
        &self,
        location: &StoreLocation,
        config: &StorageConfig,
    ) -> AuroraResult<PooledConnection> {
        let key = PoolKey::for_current_thread(location);
        let mut connections = self.lock()?;
        if let Some(conn) = connections.get(&key) {
            return Ok(Arc::clone(conn));
        }

        let conn = open_connection(location, config)?;
        self.opened.fetch_add(1, Ordering::Relaxed);
        debug!(location = %location.describe(), "opened pooled connection");

        let pooled = Arc::new(Mutex::new(conn));
        if key.thread.is_some() {
            // Fails only while this thread's locals are being torn down.
            let _ = THREAD_LEASES.try_with(|leases| leases.borrow_mut().record(&self.connections, &key));
        }
        connections.insert(key, Arc::clone(&pooled));
        Ok(pooled)
    }

    /// Drop every registered connection. Returns how many were removed.
    /// Connections still held by callers stay open until released.
    pub fn clear(&self) -> AuroraResult<usize> {
        let mut connections = self.lock()?;
        let removed = connections.len();
        connections.clear();
        Ok(removed)
    }

    /// Drop every connection registered for one location, across all threads.
    pub fn clear_location(&self, location: &StoreLocation) -> AuroraResult<usize> {
        let mut connections = self.lock()?;
        let before = connections.len();
        connections.retain(|key, _| &key.location != location);
        Ok(before - connections.len())
    }

    /// Number of live registered connections.
    pub fn len(&self) -> usize {
        self.connections.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live registered connections for one location.
    pub fn len_for(&self, location: &StoreLocation) -> usize {
        self.connections
            .lock()
            .map(|c| c.keys().filter(|k| &k.location == location).count())
            .unwrap_or(0)
    }

    /// Total connections ever opened by this pool.
    pub fn opened_count(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }

    fn lock(&self) -> AuroraResult<MutexGuard<'_, HashMap<PoolKey, PooledConnection>>> {
        self.connections.lock().map_err(|e| {
            AuroraError::Storage(StorageError::PoolLockPoisoned {
                details: e.to_string(),
            })
        })
    }
}

impl Default for ConnectionPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Open and configure a raw connection. A missing database file (and its
/// parent directories) is created on demand.
fn open_connection(location: &StoreLocation, config: &StorageConfig) -> AuroraResult<Connection> {
    let conn_err = |reason: String| {
        AuroraError::Storage(StorageError::ConnectionFailed {
            location: location.describe(),
            reason,
        })
    };

    let conn = match location {
        StoreLocation::File(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AuroraError::Storage(StorageError::Io {
                            path: parent.display().to_string(),
                            reason: e.to_string(),
                        })
                    })?;
                }
            }
            Connection::open(path).map_err(|e| conn_err(e.to_string()))?
        }
        StoreLocation::Memory(_) => {
            Connection::open_in_memory().map_err(|e| conn_err(e.to_string()))?
        }
    };

    pragmas::apply_pragmas(&conn, config, location.is_memory())?;
    Ok(conn)
}
