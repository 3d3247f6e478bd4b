//! v002: optional embedding column on chunks (f32 little-endian blob).

use rusqlite::Connection;

use aurora_core::errors::AuroraResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AuroraResult<()> {
    conn.execute_batch("ALTER TABLE chunks ADD COLUMN embedding BLOB;")
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
