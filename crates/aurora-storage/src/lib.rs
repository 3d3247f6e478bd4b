//! # aurora-storage
//!
//! Durable chunk storage on SQLite.
//!
//! - Construction is free: schema creation runs on the first real operation.
//! - Connections come from a process-wide [`ConnectionPool`] keyed by
//!   (thread, location); in-memory stores share one connection.
//! - Full-text search (FTS5) is an optional capability detected once.

pub mod engine;
pub mod location;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::{ChunkStore, StoreCapabilities};
pub use location::StoreLocation;
pub use pool::{ConnectionPool, PooledConnection};

use aurora_core::errors::{AuroraError, StorageError};
use chrono::{DateTime, SecondsFormat, Utc};

/// Helper to convert a message into a storage error.
pub fn to_storage_err(msg: impl Into<String>) -> AuroraError {
    AuroraError::Storage(StorageError::SqliteError {
        message: msg.into(),
    })
}

/// Convert a rusqlite error, classifying corruption separately.
pub fn from_sqlite(e: rusqlite::Error) -> AuroraError {
    use rusqlite::ErrorCode;
    match e.sqlite_error_code() {
        Some(ErrorCode::NotADatabase) | Some(ErrorCode::DatabaseCorrupt) => {
            AuroraError::Storage(StorageError::CorruptionDetected {
                details: e.to_string(),
            })
        }
        _ => to_storage_err(e.to_string()),
    }
}

/// Fixed-width RFC 3339, so stored timestamps sort lexicographically.
pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_ts(s: &str) -> Result<DateTime<Utc>, AuroraError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("invalid timestamp {s:?}: {e}")))
}
