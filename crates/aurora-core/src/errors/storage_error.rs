/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("database corruption detected: {details}")]
    CorruptionDetected { details: String },

    #[error("failed to open connection to {location}: {reason}")]
    ConnectionFailed { location: String, reason: String },

    #[error("connection pool lock poisoned: {details}")]
    PoolLockPoisoned { details: String },

    #[error("I/O error at {path}: {reason}")]
    Io { path: String, reason: String },
}
