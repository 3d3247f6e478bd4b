//! v001: chunks, activations, relationships.

use rusqlite::Connection;

use aurora_core::errors::AuroraResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AuroraResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS chunks (
            id          TEXT PRIMARY KEY,
            type        TEXT NOT NULL CHECK (type IN ('code', 'kb', 'doc', 'reas')),
            content     TEXT NOT NULL,
            metadata    TEXT NOT NULL DEFAULT '{}',
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_chunks_type ON chunks(type);
        CREATE INDEX IF NOT EXISTS idx_chunks_updated ON chunks(updated_at);

        CREATE TABLE IF NOT EXISTS activations (
            chunk_id     TEXT PRIMARY KEY REFERENCES chunks(id) ON DELETE CASCADE,
            base_level   REAL NOT NULL,
            last_access  TEXT NOT NULL,
            access_count INTEGER NOT NULL DEFAULT 0 CHECK (access_count >= 0)
        );

        CREATE INDEX IF NOT EXISTS idx_activations_base_level ON activations(base_level DESC);

        CREATE TABLE IF NOT EXISTS relationships (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            from_chunk        TEXT NOT NULL REFERENCES chunks(id) ON DELETE CASCADE,
            to_chunk          TEXT NOT NULL REFERENCES chunks(id) ON DELETE CASCADE,
            relationship_type TEXT NOT NULL,
            weight            REAL NOT NULL DEFAULT 1.0
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
