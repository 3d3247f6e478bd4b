use serde::{Deserialize, Serialize};

use super::defaults;

/// BM25 keyword index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Length normalization strength, in [0, 1].
    pub b: f64,
    /// Tokens shorter than this are dropped.
    pub min_token_len: usize,
    /// Persist a corpus-wide index next to the database.
    pub persist: bool,
    /// Snapshot location. Defaults to `<db_path>.bm25.json`.
    pub snapshot_path: Option<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            k1: defaults::DEFAULT_BM25_K1,
            b: defaults::DEFAULT_BM25_B,
            min_token_len: defaults::DEFAULT_MIN_TOKEN_LEN,
            persist: true,
            snapshot_path: None,
        }
    }
}
