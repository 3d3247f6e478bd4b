use serde::{Deserialize, Serialize};

use super::defaults;
use super::KeywordConfig;

/// Hybrid retrieval configuration.
///
/// Weights are applied as-is to the normalized sub-scores; they are not
/// required to sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub keyword_weight: f64,
    pub activation_weight: f64,
    pub semantic_weight: f64,
    /// Result count used by `retrieve_default`.
    pub default_top_k: usize,
    /// Candidates requested from the full-text path.
    pub candidate_limit: usize,
    /// Candidates taken by raw activation when full-text search is absent.
    pub activation_candidates: usize,
    /// Candidates taken from the persisted keyword index when full-text search is absent.
    pub keyword_candidates: usize,
    pub keyword: KeywordConfig,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            keyword_weight: defaults::DEFAULT_KEYWORD_WEIGHT,
            activation_weight: defaults::DEFAULT_ACTIVATION_WEIGHT,
            semantic_weight: defaults::DEFAULT_SEMANTIC_WEIGHT,
            default_top_k: defaults::DEFAULT_TOP_K,
            candidate_limit: defaults::DEFAULT_CANDIDATE_LIMIT,
            activation_candidates: defaults::DEFAULT_ACTIVATION_CANDIDATES,
            keyword_candidates: defaults::DEFAULT_KEYWORD_CANDIDATES,
            keyword: KeywordConfig::default(),
        }
    }
}
