//! Direct writes to a store's activation rows, for staging histories that
//! normal saves never produce (such as `access_count = 0`).

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use aurora_core::errors::{AuroraError, AuroraResult, StorageError};

/// Overwrite a chunk's activation state. Use inside `ChunkStore::with_conn`.
pub fn stage_activation(
    conn: &Connection,
    chunk_id: &str,
    base_level: f64,
    access_count: u64,
    last_access: DateTime<Utc>,
) -> AuroraResult<()> {
    let updated = conn
        .execute(
            "UPDATE activations SET base_level = ?2, access_count = ?3, last_access = ?4
             WHERE chunk_id = ?1",
            params![
                chunk_id,
                base_level,
                access_count as i64,
                last_access.to_rfc3339_opts(SecondsFormat::Nanos, true)
            ],
        )
        .map_err(|e| {
            AuroraError::Storage(StorageError::SqliteError {
                message: e.to_string(),
            })
        })?;
    if updated == 0 {
        return Err(AuroraError::ChunkNotFound {
            id: chunk_id.to_string(),
        });
    }
    Ok(())
}
