/// Malformed chunk data, rejected before any write.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("chunk id must not be empty")]
    EmptyId,

    #[error("invalid chunk type: {type_name} (expected code, kb, doc or reas)")]
    InvalidChunkType { type_name: String },

    #[error("invalid line range: start {start} > end {end}")]
    InvalidLineRange { start: u32, end: u32 },

    #[error("embedding contains a non-finite value at index {index}")]
    NonFiniteEmbedding { index: usize },

    #[error("invalid metadata: {reason}")]
    InvalidMetadata { reason: String },
}
