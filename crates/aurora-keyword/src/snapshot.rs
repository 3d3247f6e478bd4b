//! On-disk keyword index snapshot.
//!
//! JSON with a format version and the corpus fingerprint the index was
//! built from. Writes go to a sibling temp file and are renamed into place,
//! so readers never observe a half-written snapshot.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use aurora_core::errors::KeywordIndexError;

use crate::bm25::Bm25Index;

/// Bumped whenever the serialized layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub version: u32,
    /// `IChunkStore::corpus_fingerprint` at build time.
    pub fingerprint: String,
    pub index: Bm25Index,
}

impl IndexSnapshot {
    pub fn new(fingerprint: String, index: Bm25Index) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            fingerprint,
            index,
        }
    }
}

/// Read a snapshot. `Ok(None)` when the file does not exist.
pub fn load(path: &Path) -> Result<Option<IndexSnapshot>, KeywordIndexError> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(KeywordIndexError::SnapshotIo {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        }
    };

    let mut snapshot: IndexSnapshot =
        serde_json::from_slice(&bytes).map_err(|e| KeywordIndexError::SnapshotFormat {
            reason: e.to_string(),
        })?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(KeywordIndexError::SnapshotFormat {
            reason: format!(
                "version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            ),
        });
    }
    snapshot.index.rebuild_positions();
    Ok(Some(snapshot))
}

/// Write a snapshot atomically.
pub fn save(path: &Path, snapshot: &IndexSnapshot) -> Result<(), KeywordIndexError> {
    let io_err = |p: &Path, e: std::io::Error| KeywordIndexError::SnapshotIo {
        path: p.display().to_string(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
    }

    let json = serde_json::to_vec(snapshot).map_err(|e| KeywordIndexError::SnapshotFormat {
        reason: e.to_string(),
    })?;
    let tmp = temp_path(path);
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        io_err(path, e)
    })?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".tmp-{}", std::process::id()));
    path.with_file_name(name)
}
