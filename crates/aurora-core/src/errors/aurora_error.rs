use super::{EmbeddingError, KeywordIndexError, StorageError, ValidationError};

/// Top-level error for every Aurora crate.
#[derive(Debug, thiserror::Error)]
pub enum AuroraError {
    #[error("chunk not found: {id}")]
    ChunkNotFound { id: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("keyword index error: {0}")]
    KeywordIndex(#[from] KeywordIndexError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AuroraError {
    /// Whether this error originated in the storage layer.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Whether this error was caused by malformed input data.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type AuroraResult<T> = Result<T, AuroraError>;
