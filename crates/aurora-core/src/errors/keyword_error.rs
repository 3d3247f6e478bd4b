/// Persisted keyword index errors.
#[derive(Debug, thiserror::Error)]
pub enum KeywordIndexError {
    #[error("snapshot I/O failed at {path}: {reason}")]
    SnapshotIo { path: String, reason: String },

    #[error("snapshot format invalid: {reason}")]
    SnapshotFormat { reason: String },
}
