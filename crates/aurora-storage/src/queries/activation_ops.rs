//! Activation row reads and updates.

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use aurora_core::chunk::{AccessStats, ActivationRecord};
use aurora_core::constants::MAX_BATCH_PARAMS;
use aurora_core::errors::{AuroraError, AuroraResult};

use crate::{format_ts, from_sqlite, parse_ts};

/// Add `delta` to a chunk's base level, count one access and stamp `last_access`.
pub fn update_activation(conn: &Connection, chunk_id: &str, delta: f64) -> AuroraResult<()> {
    let updated = conn
        .execute(
            "UPDATE activations
             SET base_level = base_level + ?2,
                 access_count = access_count + 1,
                 last_access = ?3
             WHERE chunk_id = ?1",
            params![chunk_id, delta, format_ts(&Utc::now())],
        )
        .map_err(from_sqlite)?;
    if updated == 0 {
        return Err(AuroraError::ChunkNotFound {
            id: chunk_id.to_string(),
        });
    }
    Ok(())
}

pub fn get_activation(conn: &Connection, chunk_id: &str) -> AuroraResult<Option<ActivationRecord>> {
    let row: Option<(f64, String, i64)> = conn
        .query_row(
            "SELECT base_level, last_access, access_count FROM activations WHERE chunk_id = ?1",
            [chunk_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()
        .map_err(from_sqlite)?;

    row.map(|(base_level, last_access, access_count)| {
        Ok(ActivationRecord {
            chunk_id: chunk_id.to_string(),
            base_level,
            last_access: parse_ts(&last_access)?,
            access_count: access_count.max(0) as u64,
        })
    })
    .transpose()
}

/// Access statistics for many chunks, batched to stay under SQLite's
/// parameter limit. Ids without an activation row are absent from the map.
pub fn get_access_stats_batch(
    conn: &Connection,
    ids: &[String],
) -> AuroraResult<HashMap<String, AccessStats>> {
    let mut out = HashMap::with_capacity(ids.len());
    for batch in ids.chunks(MAX_BATCH_PARAMS) {
        let placeholders = vec!["?"; batch.len()].join(", ");
        let sql = format!(
            "SELECT a.chunk_id, a.base_level, a.last_access, a.access_count, c.created_at
             FROM activations a
             JOIN chunks c ON c.id = a.chunk_id
             WHERE a.chunk_id IN ({placeholders})"
        );
        let mut stmt = conn.prepare(&sql).map_err(from_sqlite)?;
        let rows = stmt
            .query_map(params_from_iter(batch.iter()), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(from_sqlite)?;

        for row in rows {
            let (id, base_level, last_access, access_count, created_at) =
                row.map_err(from_sqlite)?;
            out.insert(
                id,
                AccessStats {
                    access_count: access_count.max(0) as u64,
                    last_access: parse_ts(&last_access)?,
                    first_access: parse_ts(&created_at)?,
                    base_level,
                },
            );
        }
    }
    Ok(out)
}
