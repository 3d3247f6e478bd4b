//! VACUUM, checkpoint, integrity check.

use rusqlite::Connection;

use aurora_core::errors::AuroraResult;

use crate::from_sqlite;

/// Run full vacuum.
pub fn full_vacuum(conn: &Connection) -> AuroraResult<()> {
    conn.execute_batch("VACUUM").map_err(from_sqlite)?;
    Ok(())
}

/// WAL checkpoint. A no-op for in-memory databases.
pub fn wal_checkpoint(conn: &Connection) -> AuroraResult<()> {
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")
        .map_err(from_sqlite)?;
    Ok(())
}

/// Run integrity check. Returns true if database is OK.
pub fn integrity_check(conn: &Connection) -> AuroraResult<bool> {
    let result: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .map_err(from_sqlite)?;
    Ok(result == "ok")
}
