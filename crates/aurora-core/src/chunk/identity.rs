use std::fmt;
use std::path::PathBuf;

use crate::constants::IN_MEMORY_IDENTITY;

/// Identity of a backing store, used to key process-wide caches.
///
/// All in-memory stores share the single `InMemory` identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreIdentity {
    InMemory,
    File(PathBuf),
}

impl StoreIdentity {
    pub fn is_in_memory(&self) -> bool {
        matches!(self, Self::InMemory)
    }
}

impl fmt::Display for StoreIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InMemory => f.write_str(IN_MEMORY_IDENTITY),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
