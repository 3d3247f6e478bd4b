use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding source: "none" or "hashing".
    pub provider: String,
    /// Vector dimensions.
    pub dimensions: usize,
    /// Max cached chunk-text embeddings.
    pub cache_size: u64,
    /// Cached vectors unread for this long are evicted.
    pub cache_idle_secs: u64,
    /// Cached vectors older than this are evicted.
    pub cache_ttl_secs: u64,
}

impl EmbeddingConfig {
    pub fn is_disabled(&self) -> bool {
        self.provider.eq_ignore_ascii_case("none") || self.provider.is_empty()
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            cache_size: defaults::DEFAULT_EMBEDDING_CACHE_SIZE,
            cache_idle_secs: defaults::DEFAULT_EMBEDDING_CACHE_IDLE_SECS,
            cache_ttl_secs: defaults::DEFAULT_EMBEDDING_CACHE_TTL_SECS,
        }
    }
}
