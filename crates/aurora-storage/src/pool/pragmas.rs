//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode (file-backed only), NORMAL sync, configurable cache and
//! busy_timeout, foreign_keys ON for cascade deletes.

use rusqlite::Connection;

use aurora_core::config::StorageConfig;
use aurora_core::errors::AuroraResult;

use crate::from_sqlite;

/// Apply all performance and safety pragmas to a connection.
pub fn apply_pragmas(conn: &Connection, config: &StorageConfig, in_memory: bool) -> AuroraResult<()> {
    conn.busy_timeout(std::time::Duration::from_millis(u64::from(config.busy_timeout_ms)))
        .map_err(from_sqlite)?;

    if !in_memory {
        // journal_mode returns a row, so it goes through pragma_update_and_check.
        let _mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(from_sqlite)?;
    }

    conn.execute_batch(&format!(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = {};
        PRAGMA foreign_keys = ON;
        ",
        config.cache_size
    ))
    .map_err(from_sqlite)?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> AuroraResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(from_sqlite)?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}

/// Whether foreign key enforcement is on.
pub fn foreign_keys_enabled(conn: &Connection) -> AuroraResult<bool> {
    let on: i64 = conn
        .pragma_query_value(None, "foreign_keys", |row| row.get(0))
        .map_err(from_sqlite)?;
    Ok(on == 1)
}
