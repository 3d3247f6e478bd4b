//! Relationship edge CRUD.

use rusqlite::{params, Connection};

use aurora_core::chunk::Relationship;
use aurora_core::errors::AuroraResult;

use crate::from_sqlite;

/// Insert an edge. Both endpoints must exist. Returns the new row id.
pub fn add_relationship(conn: &Connection, rel: &Relationship) -> AuroraResult<i64> {
    conn.execute(
        "INSERT INTO relationships (from_chunk, to_chunk, relationship_type, weight)
         VALUES (?1, ?2, ?3, ?4)",
        params![rel.from_chunk, rel.to_chunk, rel.relationship_type, rel.weight],
    )
    .map_err(from_sqlite)?;
    Ok(conn.last_insert_rowid())
}

/// Every edge touching `chunk_id`, in either direction, oldest first.
pub fn get_relationships(conn: &Connection, chunk_id: &str) -> AuroraResult<Vec<Relationship>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, from_chunk, to_chunk, relationship_type, weight
             FROM relationships
             WHERE from_chunk = ?1 OR to_chunk = ?1
             ORDER BY id",
        )
        .map_err(from_sqlite)?;
    let rows = stmt
        .query_map([chunk_id], |row| {
            Ok(Relationship {
                id: Some(row.get(0)?),
                from_chunk: row.get(1)?,
                to_chunk: row.get(2)?,
                relationship_type: row.get(3)?,
                weight: row.get(4)?,
            })
        })
        .map_err(from_sqlite)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(from_sqlite)
}

/// Remove an edge by id. Returns whether it existed.
pub fn remove_relationship(conn: &Connection, id: i64) -> AuroraResult<bool> {
    let deleted = conn
        .execute("DELETE FROM relationships WHERE id = ?1", [id])
        .map_err(from_sqlite)?;
    Ok(deleted > 0)
}
