//! Embedding source selection.

mod hashing;

use std::sync::Arc;

use tracing::info;

use aurora_core::config::EmbeddingConfig;
use aurora_core::errors::{AuroraResult, EmbeddingError};
use aurora_core::traits::IEmbeddingSource;

pub use hashing::{HashingEmbeddingSource, HASHING_SOURCE_NAME};

/// Build the configured source. `none` (or an empty provider) yields `None`,
/// which puts retrieval in dual-hybrid mode.
pub fn create_source(config: &EmbeddingConfig) -> AuroraResult<Option<Arc<dyn IEmbeddingSource>>> {
    if config.is_disabled() {
        info!("embedding source disabled");
        return Ok(None);
    }

    match config.provider.to_ascii_lowercase().as_str() {
        HASHING_SOURCE_NAME => {
            info!(dims = config.dimensions, "using hashing embedding source");
            Ok(Some(Arc::new(HashingEmbeddingSource::new(config.dimensions))))
        }
        _ => Err(EmbeddingError::UnknownProvider {
            provider: config.provider.clone(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_core::errors::AuroraError;

    fn config(provider: &str) -> EmbeddingConfig {
        EmbeddingConfig {
            provider: provider.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn none_and_empty_disable() {
        assert!(create_source(&config("none")).unwrap().is_none());
        assert!(create_source(&config("NONE")).unwrap().is_none());
        assert!(create_source(&config("")).unwrap().is_none());
    }

    #[test]
    fn hashing_selected_case_insensitively() {
        let source = create_source(&config("Hashing")).unwrap().unwrap();
        assert_eq!(source.name(), "hashing");
        assert_eq!(source.dimensions(), EmbeddingConfig::default().dimensions);
    }

    #[test]
    fn unknown_provider_rejected() {
        match create_source(&config("onnx")) {
            Err(AuroraError::Embedding(EmbeddingError::UnknownProvider { provider })) => {
                assert_eq!(provider, "onnx");
            }
            other => panic!("expected UnknownProvider, got {:?}", other.map(|s| s.is_some())),
        }
    }
}
