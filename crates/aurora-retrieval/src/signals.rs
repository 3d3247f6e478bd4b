use serde::{Deserialize, Serialize};

use aurora_core::config::RetrievalConfig;
use aurora_core::traits::IEmbeddingSource;

/// Which relevance signals contribute to the fused score.
///
/// Sealed when the retriever is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSignals {
    pub keyword: bool,
    pub activation: bool,
    pub semantic: bool,
}

impl ActiveSignals {
    /// A signal is active when its weight is positive. Semantic additionally
    /// needs a source that reports itself available.
    pub fn resolve(config: &RetrievalConfig, source: Option<&dyn IEmbeddingSource>) -> Self {
        Self {
            keyword: config.keyword_weight > 0.0,
            activation: config.activation_weight > 0.0,
            semantic: config.semantic_weight > 0.0 && source.is_some_and(|s| s.is_available()),
        }
    }

    /// Keyword and activation only.
    pub fn is_dual_hybrid(&self) -> bool {
        !self.semantic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_embeddings::HashingEmbeddingSource;

    #[test]
    fn no_source_is_dual_hybrid() {
        let s = ActiveSignals::resolve(&RetrievalConfig::default(), None);
        assert!(s.keyword && s.activation && !s.semantic);
        assert!(s.is_dual_hybrid());
    }

    #[test]
    fn available_source_enables_semantic() {
        let source = HashingEmbeddingSource::new(16);
        let s = ActiveSignals::resolve(&RetrievalConfig::default(), Some(&source));
        assert!(s.semantic);
    }

    #[test]
    fn zero_weight_disables_signal() {
        let source = HashingEmbeddingSource::new(16);
        let config = RetrievalConfig {
            semantic_weight: 0.0,
            keyword_weight: 0.0,
            ..Default::default()
        };
        let s = ActiveSignals::resolve(&config, Some(&source));
        assert!(!s.semantic);
        assert!(!s.keyword);
        assert!(s.activation);
    }
}
