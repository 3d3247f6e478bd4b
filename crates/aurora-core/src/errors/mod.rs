//! Error taxonomy.
//!
//! Storage and validation failures are hard errors. Missing optional
//! capabilities (full-text search, git history, embeddings) are never
//! errors: callers branch on them and log a warning instead.

mod aurora_error;
mod embedding_error;
mod keyword_error;
mod storage_error;
mod validation_error;

pub use aurora_error::{AuroraError, AuroraResult};
pub use embedding_error::EmbeddingError;
pub use keyword_error::KeywordIndexError;
pub use storage_error::StorageError;
pub use validation_error::ValidationError;
