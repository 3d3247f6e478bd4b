//! FTS5 full-text search and activation-ordered retrieval.

use rusqlite::{params, Connection};

use aurora_core::chunk::{Chunk, ChunkType};
use aurora_core::errors::AuroraResult;
use aurora_keyword::tokenizer;

use super::chunk_crud::{collect_chunks, CHUNK_COLUMNS};
use crate::from_sqlite;

/// Text written to the full-text table: the code-aware token stream joined by
/// spaces, so `getUserName` is findable as `get`, `user`, `name` and the compound.
pub fn fts_body(chunk: &Chunk) -> String {
    tokenizer::tokenize(&chunk.searchable_text()).join(" ")
}

/// Turn free text into an FTS5 MATCH expression: every token quoted and OR-ed.
/// Returns `None` when the query has no indexable tokens.
pub fn fts_match_expression(query: &str) -> Option<String> {
    let tokens = tokenizer::tokenize(query);
    if tokens.is_empty() {
        return None;
    }
    let mut seen = std::collections::HashSet::new();
    let terms: Vec<String> = tokens
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .map(|t| format!("\"{}\"", t.replace('"', "\"\"")))
        .collect();
    Some(terms.join(" OR "))
}

/// Replace the full-text row for one chunk.
pub(crate) fn write_fts_row(conn: &Connection, rowid: i64, chunk: &Chunk) -> AuroraResult<()> {
    conn.execute("DELETE FROM chunks_fts WHERE rowid = ?1", [rowid])
        .map_err(from_sqlite)?;
    conn.execute(
        "INSERT INTO chunks_fts (rowid, body) VALUES (?1, ?2)",
        params![rowid, fts_body(chunk)],
    )
    .map_err(from_sqlite)?;
    Ok(())
}

/// Rebuild the whole full-text table from `chunks`. Returns rows written.
pub fn rebuild_fts(conn: &Connection) -> AuroraResult<usize> {
    conn.execute("DELETE FROM chunks_fts", []).map_err(from_sqlite)?;

    let mut stmt = conn
        .prepare("SELECT rowid, id FROM chunks")
        .map_err(from_sqlite)?;
    let rows = stmt
        .query_map([], |row| {
            let rowid: i64 = row.get(0)?;
            let id: String = row.get(1)?;
            Ok((rowid, id))
        })
        .map_err(from_sqlite)?;
    let mut keys = Vec::new();
    for row in rows {
        keys.push(row.map_err(from_sqlite)?);
    }

    let mut written = 0;
    for (rowid, id) in keys {
        if let Some(chunk) = super::chunk_crud::get_chunk(conn, &id)? {
            write_fts_row(conn, rowid, &chunk)?;
            written += 1;
        }
    }
    Ok(written)
}

/// Search chunks through the FTS5 index, best match first.
pub fn search_fts(conn: &Connection, query: &str, limit: usize) -> AuroraResult<Vec<Chunk>> {
    let Some(expression) = fts_match_expression(query) else {
        return Ok(Vec::new());
    };
    let sql = format!(
        "SELECT {CHUNK_COLUMNS}
         FROM chunks_fts fts
         JOIN chunks c ON c.rowid = fts.rowid
         WHERE chunks_fts MATCH ?1
         ORDER BY rank
         LIMIT ?2"
    );
    collect_chunks(conn, &sql, params![expression, limit as i64])
}

/// Chunks whose base level is at least `min_activation`, highest first.
/// Ties break on id so the order is stable.
pub fn retrieve_by_activation(
    conn: &Connection,
    min_activation: f64,
    limit: usize,
    type_filter: Option<ChunkType>,
) -> AuroraResult<Vec<Chunk>> {
    let base = format!(
        "SELECT {CHUNK_COLUMNS}
         FROM chunks c
         JOIN activations a ON a.chunk_id = c.id
         WHERE a.base_level >= ?1"
    );
    match type_filter {
        Some(t) => {
            let sql = format!("{base} AND c.type = ?3 ORDER BY a.base_level DESC, c.id ASC LIMIT ?2");
            collect_chunks(conn, &sql, params![min_activation, limit as i64, t.as_str()])
        }
        None => {
            let sql = format!("{base} ORDER BY a.base_level DESC, c.id ASC LIMIT ?2");
            collect_chunks(conn, &sql, params![min_activation, limit as i64])
        }
    }
}

