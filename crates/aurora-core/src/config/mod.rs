//! Configuration tree. Every section falls back to its defaults, so an
//! empty TOML document is a valid configuration.

pub mod activation_config;
pub mod defaults;
pub mod embedding_config;
pub mod keyword_config;
pub mod observability_config;
pub mod retrieval_config;
pub mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use activation_config::{ActivationConfig, DecayPreset};
pub use embedding_config::EmbeddingConfig;
pub use keyword_config::KeywordConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use storage_config::StorageConfig;

use crate::errors::{AuroraError, AuroraResult};

/// Environment variable that disables git-history derivation when set to a truthy value.
pub const ENV_SKIP_GIT_HISTORY: &str = "AURORA_SKIP_GIT_HISTORY";
pub const ENV_DB_PATH: &str = "AURORA_DB_PATH";
pub const ENV_EMBEDDING_PROVIDER: &str = "AURORA_EMBEDDING_PROVIDER";
pub const ENV_LOG_LEVEL: &str = "AURORA_LOG_LEVEL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuroraConfig {
    pub storage: StorageConfig,
    pub activation: ActivationConfig,
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub observability: ObservabilityConfig,
}

impl AuroraConfig {
    /// Parse a TOML document. Missing sections and fields take defaults.
    pub fn from_toml(toml_str: &str) -> AuroraResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| AuroraError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, then apply environment overrides.
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> AuroraResult<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                AuroraError::ConfigError(format!("failed to read {}: {e}", path.display()))
            })?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `AURORA_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(ENV_DB_PATH) {
            if !val.is_empty() {
                self.storage.db_path = val;
            }
        }
        if git_history_disabled_by_env() {
            self.activation.git_history = false;
        }
        if let Ok(val) = std::env::var(ENV_EMBEDDING_PROVIDER) {
            self.embedding.provider = val;
        }
        if let Ok(val) = std::env::var(ENV_LOG_LEVEL) {
            self.observability.log_level = val;
        }
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> AuroraResult<()> {
        let r = &self.retrieval;
        for (name, weight) in [
            ("keyword_weight", r.keyword_weight),
            ("activation_weight", r.activation_weight),
            ("semantic_weight", r.semantic_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AuroraError::ConfigError(format!(
                    "retrieval.{name} must be a non-negative number, got {weight}"
                )));
            }
        }
        if r.keyword.k1 < 0.0 {
            return Err(AuroraError::ConfigError(format!(
                "retrieval.keyword.k1 must be >= 0, got {}",
                r.keyword.k1
            )));
        }
        if !(0.0..=1.0).contains(&r.keyword.b) {
            return Err(AuroraError::ConfigError(format!(
                "retrieval.keyword.b must be in [0, 1], got {}",
                r.keyword.b
            )));
        }
        for (type_name, rate) in &self.activation.type_decay_overrides {
            if *rate <= 0.0 || !rate.is_finite() {
                return Err(AuroraError::ConfigError(format!(
                    "activation decay rate for {type_name} must be > 0, got {rate}"
                )));
            }
        }
        if self.activation.min_elapsed_secs <= 0.0 {
            return Err(AuroraError::ConfigError(
                "activation.min_elapsed_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Whether `AURORA_SKIP_GIT_HISTORY` is set to a truthy value.
pub fn git_history_disabled_by_env() -> bool {
    std::env::var(ENV_SKIP_GIT_HISTORY)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
