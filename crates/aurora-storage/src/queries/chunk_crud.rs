//! Upsert, get, delete, and bulk reads for chunks.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use tracing::debug;

use aurora_core::chunk::{Chunk, ChunkContent, ChunkType};
use aurora_core::constants::{DEFAULT_BASE_LEVEL, SEED_ACCESS_COUNT};
use aurora_core::errors::{AuroraError, AuroraResult};

use super::chunk_search::write_fts_row;
use crate::{format_ts, from_sqlite, parse_ts, to_storage_err};

/// Columns selected by every chunk read, in `parse_chunk_row` order.
pub(crate) const CHUNK_COLUMNS: &str =
    "c.id, c.type, c.content, c.metadata, c.embedding, c.created_at, c.updated_at";

/// Insert or update a chunk and its activation row in one IMMEDIATE transaction.
///
/// New chunks get an activation row seeded with `seed` (or the neutral
/// default), one access, and `last_access = now`.
///
/// Re-saving identical content (type, content, embedding) is idempotent: the
/// chunk keeps its access count, `last_access` is refreshed, and the base
/// level is overwritten only when `seed` is given. Re-saving changed content
/// is a re-index: the old row is deleted first, so its activation,
/// relationship and full-text rows cascade away and the chunk is seeded anew.
/// When `fts` is true the full-text row is rewritten too.
pub fn upsert_chunk(
    conn: &Connection,
    chunk: &Chunk,
    seed: Option<f64>,
    fts: bool,
) -> AuroraResult<()> {
    chunk.validate()?;

    let content_json = serde_json::to_string(&chunk.content)?;
    let metadata_json = serde_json::to_string(&chunk.metadata)?;
    let embedding_blob = chunk.embedding.as_deref().map(f32_vec_to_bytes);
    let now = format_ts(&Utc::now());

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| to_storage_err(format!("upsert_chunk begin: {e}")))?;

    let stored: Option<(String, String, Option<Vec<u8>>)> = tx
        .query_row(
            "SELECT type, content, embedding FROM chunks WHERE id = ?1",
            [&chunk.id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()
        .map_err(from_sqlite)?;
    if let Some((stored_type, stored_content, stored_embedding)) = stored {
        let changed = stored_type != chunk.chunk_type.as_str()
            || stored_content != content_json
            || stored_embedding != embedding_blob;
        if changed {
            tx.execute("DELETE FROM chunks WHERE id = ?1", [&chunk.id])
                .map_err(from_sqlite)?;
            debug!(chunk_id = %chunk.id, "content changed, chunk re-indexed");
        }
    }

    tx.execute(
        "INSERT INTO chunks (id, type, content, metadata, embedding, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
            type = excluded.type,
            content = excluded.content,
            metadata = excluded.metadata,
            embedding = excluded.embedding,
            updated_at = excluded.updated_at",
        params![
            chunk.id,
            chunk.chunk_type.as_str(),
            content_json,
            metadata_json,
            embedding_blob,
            format_ts(&chunk.created_at),
            now,
        ],
    )
    .map_err(from_sqlite)?;

    let activation_sql = if seed.is_some() {
        "INSERT INTO activations (chunk_id, base_level, last_access, access_count)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(chunk_id) DO UPDATE SET
            base_level = excluded.base_level,
            last_access = excluded.last_access"
    } else {
        "INSERT INTO activations (chunk_id, base_level, last_access, access_count)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(chunk_id) DO UPDATE SET
            last_access = excluded.last_access"
    };
    tx.execute(
        activation_sql,
        params![
            chunk.id,
            seed.unwrap_or(DEFAULT_BASE_LEVEL),
            now,
            SEED_ACCESS_COUNT as i64,
        ],
    )
    .map_err(from_sqlite)?;

    if fts {
        let rowid: i64 = tx
            .query_row("SELECT rowid FROM chunks WHERE id = ?1", [&chunk.id], |row| row.get(0))
            .map_err(from_sqlite)?;
        write_fts_row(&tx, rowid, chunk)?;
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("upsert_chunk commit: {e}")))?;
    Ok(())
}

/// Get a single chunk by id.
pub fn get_chunk(conn: &Connection, id: &str) -> AuroraResult<Option<Chunk>> {
    let sql = format!("SELECT {CHUNK_COLUMNS} FROM chunks c WHERE c.id = ?1");
    let row = conn
        .query_row(&sql, [id], |row| Ok(parse_chunk_row(row)))
        .optional()
        .map_err(from_sqlite)?;
    row.transpose()
}

/// Delete a chunk. Activation, relationships and the full-text row go with it.
pub fn delete_chunk(conn: &Connection, id: &str) -> AuroraResult<bool> {
    let deleted = conn
        .execute("DELETE FROM chunks WHERE id = ?1", [id])
        .map_err(from_sqlite)?;
    Ok(deleted > 0)
}

/// Every chunk, ordered by id.
pub fn all_chunks(conn: &Connection) -> AuroraResult<Vec<Chunk>> {
    let sql = format!("SELECT {CHUNK_COLUMNS} FROM chunks c ORDER BY c.id");
    collect_chunks(conn, &sql, [])
}

/// Fetch the chunks for a set of ids, in the order given. Missing ids are skipped.
pub fn get_chunks_by_ids(conn: &Connection, ids: &[String]) -> AuroraResult<Vec<Chunk>> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(chunk) = get_chunk(conn, id)? {
            out.push(chunk);
        }
    }
    Ok(out)
}

pub fn chunk_count(conn: &Connection) -> AuroraResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))
        .map_err(from_sqlite)?;
    Ok(count as usize)
}

/// Cheap digest of the corpus: changes whenever a chunk is added, removed or updated.
pub fn corpus_fingerprint(conn: &Connection) -> AuroraResult<String> {
    let (count, latest, total_len): (i64, Option<String>, Option<i64>) = conn
        .query_row(
            "SELECT COUNT(*), MAX(updated_at), SUM(length(content)) FROM chunks",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .map_err(from_sqlite)?;
    let material = format!(
        "{count}|{}|{}",
        latest.unwrap_or_default(),
        total_len.unwrap_or(0)
    );
    Ok(blake3::hash(material.as_bytes()).to_hex().to_string())
}

/// Run a chunk-returning query.
pub(crate) fn collect_chunks<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> AuroraResult<Vec<Chunk>> {
    let mut stmt = conn.prepare(sql).map_err(from_sqlite)?;
    let rows = stmt
        .query_map(params, |row| Ok(parse_chunk_row(row)))
        .map_err(from_sqlite)?;

    let mut results = Vec::new();
    for row in rows {
        let chunk = row.map_err(from_sqlite)??;
        results.push(chunk);
    }
    Ok(results)
}

/// Parse a row selected with [`CHUNK_COLUMNS`].
pub(crate) fn parse_chunk_row(row: &Row<'_>) -> AuroraResult<Chunk> {
    let id: String = row.get(0).map_err(from_sqlite)?;
    let type_str: String = row.get(1).map_err(from_sqlite)?;
    let content_json: String = row.get(2).map_err(from_sqlite)?;
    let metadata_json: String = row.get(3).map_err(from_sqlite)?;
    let embedding_blob: Option<Vec<u8>> = row.get(4).map_err(from_sqlite)?;
    let created_at: String = row.get(5).map_err(from_sqlite)?;
    let updated_at: String = row.get(6).map_err(from_sqlite)?;

    let chunk_type: ChunkType = type_str.parse().map_err(AuroraError::Validation)?;
    let content: ChunkContent = serde_json::from_str(&content_json)
        .map_err(|e| to_storage_err(format!("chunk {id}: bad content: {e}")))?;
    let metadata = serde_json::from_str(&metadata_json)
        .map_err(|e| to_storage_err(format!("chunk {id}: bad metadata: {e}")))?;

    Ok(Chunk {
        id,
        chunk_type,
        content,
        embedding: embedding_blob.map(|b| bytes_to_f32_vec(&b)),
        metadata,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

/// Encode a vector as little-endian f32 bytes.
pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Decode little-endian f32 bytes. Trailing partial values are ignored.
pub fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
