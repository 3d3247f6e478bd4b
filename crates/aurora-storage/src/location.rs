//! Where a store lives, and the identity derived from it.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use aurora_core::constants::IN_MEMORY_IDENTITY;
use aurora_core::StoreIdentity;

static NEXT_MEMORY_ID: AtomicU64 = AtomicU64::new(1);

/// Physical location of a store.
///
/// Every in-memory store gets its own location (a separate database), but
/// they all share the [`StoreIdentity::InMemory`] identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreLocation {
    File(PathBuf),
    Memory(u64),
}

impl StoreLocation {
    /// Resolve a path string. `:memory:` yields a fresh in-memory location.
    /// Relative paths are anchored at the current directory without touching
    /// the filesystem.
    pub fn resolve(path: &Path) -> Self {
        if path.as_os_str() == IN_MEMORY_IDENTITY {
            return Self::memory();
        }
        if path.is_absolute() {
            return Self::File(path.to_path_buf());
        }
        match std::env::current_dir() {
            Ok(cwd) => Self::File(cwd.join(path)),
            Err(_) => Self::File(path.to_path_buf()),
        }
    }

    /// A new, unique in-memory location.
    pub fn memory() -> Self {
        Self::Memory(NEXT_MEMORY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory(_))
    }

    pub fn identity(&self) -> StoreIdentity {
        match self {
            Self::File(path) => StoreIdentity::File(path.clone()),
            Self::Memory(_) => StoreIdentity::InMemory,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Memory(id) => format!("{IN_MEMORY_IDENTITY}#{id}"),
        }
    }
}
