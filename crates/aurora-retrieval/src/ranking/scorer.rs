//! Weighted fusion of normalized sub-scores.

use aurora_core::chunk::Chunk;
use aurora_core::config::RetrievalConfig;

use super::normalize::min_max;
use crate::results::{RankedResult, RawScores};

/// Per-signal weights. Applied as-is; they need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    pub keyword: f64,
    pub activation: f64,
    pub semantic: f64,
}

impl FusionWeights {
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self {
            keyword: config.keyword_weight,
            activation: config.activation_weight,
            semantic: config.semantic_weight,
        }
    }
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self::from_config(&RetrievalConfig::default())
    }
}

/// Raw sub-scores, index-aligned with the candidate list.
#[derive(Debug, Clone, Default)]
pub struct SignalScores {
    pub bm25: Vec<f64>,
    pub activation: Vec<f64>,
    /// `None` when the semantic signal did not run for this query.
    pub semantic: Option<Vec<f64>>,
}

/// Normalize, fuse, filter, order and truncate.
///
/// The semantic threshold compares against the raw cosine and is applied
/// after normalization, so dropped candidates still shape the ranges.
pub fn fuse(
    candidates: Vec<Chunk>,
    raw: &SignalScores,
    weights: &FusionWeights,
    min_semantic_score: Option<f64>,
    top_k: usize,
) -> Vec<RankedResult> {
    let bm25 = min_max(&raw.bm25);
    let activation = min_max(&raw.activation);
    let semantic = raw.semantic.as_deref().map(min_max);
    let at = |v: &[f64], i: usize| v.get(i).copied().unwrap_or(0.0);

    let mut results: Vec<RankedResult> = candidates
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let raw_semantic = raw.semantic.as_deref().map(|s| at(s, i));
            let semantic_score = semantic.as_deref().map(|s| at(s, i));
            let score = weights.keyword * at(&bm25, i)
                + weights.activation * at(&activation, i)
                + semantic_score.map_or(0.0, |s| weights.semantic * s);
            RankedResult {
                chunk_id: chunk.id.clone(),
                chunk,
                score,
                bm25_score: at(&bm25, i),
                activation_score: at(&activation, i),
                semantic_score,
                raw: RawScores {
                    bm25: at(&raw.bm25, i),
                    activation: at(&raw.activation, i),
                    semantic: raw_semantic,
                },
            }
        })
        .collect();

    if let Some(min) = min_semantic_score {
        results.retain(|r| r.raw.semantic.map_or(true, |s| s >= min));
    }

    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    results.truncate(top_k);
    results
}
