use serde::Serialize;

use aurora_core::chunk::Chunk;

/// Sub-scores before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawScores {
    pub bm25: f64,
    pub activation: f64,
    /// Cosine similarity. `None` when the semantic signal did not run.
    pub semantic: Option<f64>,
}

/// One retrieved chunk with its fused score and per-signal breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub chunk_id: String,
    pub chunk: Chunk,
    /// Weighted sum of the normalized sub-scores.
    pub score: f64,
    pub bm25_score: f64,
    pub activation_score: f64,
    pub semantic_score: Option<f64>,
    pub raw: RawScores,
}
