use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::chunk::ChunkType;

/// Named decay curves. Higher exponents forget faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayPreset {
    Aggressive,
    #[default]
    Moderate,
    Gentle,
}

impl DecayPreset {
    /// Decay exponent `d` for this preset.
    pub fn decay_rate(self) -> f64 {
        match self {
            Self::Aggressive => defaults::AGGRESSIVE_DECAY_RATE,
            Self::Moderate => defaults::DEFAULT_DECAY_RATE,
            Self::Gentle => defaults::GENTLE_DECAY_RATE,
        }
    }
}

/// Activation subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationConfig {
    /// Decay curve used for types without an override.
    pub preset: DecayPreset,
    /// Per-type decay exponent overrides. Key is the chunk type name.
    pub type_decay_overrides: HashMap<String, f64>,
    /// Only the most recent N accesses contribute to the sum.
    pub max_history: usize,
    /// Floor for elapsed seconds, keeps `t^-d` finite at `t = 0`.
    pub min_elapsed_secs: f64,
    /// Activation returned for an empty access history.
    pub min_activation: f64,
    /// Derive initial base levels from version-control history.
    pub git_history: bool,
}

impl ActivationConfig {
    /// Configuration for a named preset with the default type overrides.
    pub fn with_preset(preset: DecayPreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    /// Effective decay exponent for a chunk type.
    pub fn decay_rate_for(&self, chunk_type: ChunkType) -> f64 {
        self.type_decay_overrides
            .get(chunk_type.as_str())
            .copied()
            .unwrap_or_else(|| self.preset.decay_rate())
    }
}

impl Default for ActivationConfig {
    fn default() -> Self {
        let mut type_decay_overrides = HashMap::new();
        type_decay_overrides.insert(ChunkType::Kb.as_str().to_string(), defaults::KB_DECAY_RATE);
        type_decay_overrides.insert(
            ChunkType::Reas.as_str().to_string(),
            defaults::REAS_DECAY_RATE,
        );
        Self {
            preset: DecayPreset::default(),
            type_decay_overrides,
            max_history: defaults::DEFAULT_MAX_HISTORY,
            min_elapsed_secs: defaults::DEFAULT_MIN_ELAPSED_SECS,
            min_activation: defaults::DEFAULT_MIN_ACTIVATION,
            git_history: defaults::DEFAULT_GIT_HISTORY,
        }
    }
}
