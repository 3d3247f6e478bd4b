//! Schema migrations, plus the optional full-text table.
//!
//! Versioned migrations run in order inside one IMMEDIATE transaction, so
//! two connections initializing the same file concurrently serialize and the
//! loser sees the winner's version. The FTS5 table is not a versioned
//! migration: whether it exists depends on how SQLite was compiled and on
//! configuration, so it is reconciled separately by [`ensure_full_text`].

pub mod v001_initial;
pub mod v002_embeddings;
pub mod v003_relationship_indexes;

use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{debug, info, warn};

use aurora_core::constants::SCHEMA_VERSION;
use aurora_core::errors::{AuroraError, AuroraResult, StorageError};

use crate::from_sqlite;

type MigrationFn = fn(&Connection) -> AuroraResult<()>;

const MIGRATIONS: [(u32, &str, MigrationFn); SCHEMA_VERSION as usize] = [
    (1, "initial", v001_initial::migrate),
    (2, "embeddings", v002_embeddings::migrate),
    (3, "relationship_indexes", v003_relationship_indexes::migrate),
];

/// Read the current schema version. 0 if the tracking table does not exist.
pub fn current_version(conn: &Connection) -> AuroraResult<u32> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .map_err(from_sqlite)?;
    if !exists {
        return Ok(0);
    }
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
        .optional()
        .map_err(from_sqlite)?
        .flatten();
    Ok(version.unwrap_or(0))
}

/// Bring the schema up to [`SCHEMA_VERSION`]. Returns the number applied.
pub fn run_migrations(conn: &Connection) -> AuroraResult<u32> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(from_sqlite)?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(from_sqlite)?;

    let current = current_version(&tx)?;
    if current > SCHEMA_VERSION {
        return Err(AuroraError::Storage(StorageError::MigrationFailed {
            version: current,
            reason: format!("database schema is newer than supported version {SCHEMA_VERSION}"),
        }));
    }

    let mut applied = 0;
    for (version, name, migrate) in MIGRATIONS.iter() {
        if *version <= current {
            continue;
        }
        debug!(version, name, "applying migration");
        migrate(&tx).map_err(|e| {
            AuroraError::Storage(StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })
        })?;
        tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
            .map_err(from_sqlite)?;
        applied += 1;
    }

    tx.commit().map_err(from_sqlite)?;
    if applied > 0 {
        info!(from = current, to = SCHEMA_VERSION, applied, "schema migrated");
    }
    Ok(applied)
}

/// Whether the linked SQLite library was compiled with FTS5.
pub fn fts5_available(conn: &Connection) -> bool {
    conn.query_row("SELECT sqlite_compileoption_used('ENABLE_FTS5')", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|v| v == 1)
    .unwrap_or(false)
}

/// Whether the `chunks_fts` table exists.
pub fn fts_table_exists(conn: &Connection) -> AuroraResult<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE name = 'chunks_fts'",
        [],
        |row| row.get(0),
    )
    .map_err(from_sqlite)
}

/// Create the FTS5 table when wanted and supported. Returns whether the
/// table exists afterwards.
///
/// The table stores pre-tokenized text keyed by the chunk's rowid. A delete
/// trigger keeps it free of orphans; inserts and updates are written by the
/// chunk CRUD path because tokenization happens in Rust.
pub fn ensure_full_text(conn: &Connection, wanted: bool) -> AuroraResult<bool> {
    if fts_table_exists(conn)? {
        return Ok(true);
    }
    if !wanted {
        return Ok(false);
    }
    if !fts5_available(conn) {
        warn!("SQLite built without FTS5; full-text search disabled");
        return Ok(false);
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(from_sqlite)?;
    // Re-check under the write lock; another connection may have won.
    if fts_table_exists(&tx)? {
        tx.commit().map_err(from_sqlite)?;
        return Ok(true);
    }
    tx.execute_batch(
        "
        CREATE VIRTUAL TABLE chunks_fts USING fts5(body);

        CREATE TRIGGER IF NOT EXISTS chunks_fts_delete AFTER DELETE ON chunks BEGIN
            DELETE FROM chunks_fts WHERE rowid = old.rowid;
        END;
        ",
    )
    .map_err(from_sqlite)?;

    let backfilled = crate::queries::chunk_search::rebuild_fts(&tx)?;
    tx.commit().map_err(from_sqlite)?;
    info!(backfilled, "full-text index created");
    Ok(true)
}
