//! v003: lookup indexes for relationship traversal.

use rusqlite::Connection;

use aurora_core::errors::AuroraResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AuroraResult<()> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_relationships_from ON relationships(from_chunk);
        CREATE INDEX IF NOT EXISTS idx_relationships_to ON relationships(to_chunk);
        CREATE INDEX IF NOT EXISTS idx_relationships_type ON relationships(relationship_type);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
