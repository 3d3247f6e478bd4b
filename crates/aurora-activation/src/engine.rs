//! ActivationEngine: per-type decay, query-time scoring, and seeding.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use aurora_core::chunk::{AccessStats, Chunk, ChunkType};
use aurora_core::config::{self, ActivationConfig};
use aurora_core::constants::DEFAULT_BASE_LEVEL;
use aurora_core::errors::AuroraResult;
use aurora_core::traits::IChunkStore;

use crate::formula::{calculate_decay, with_prior, AccessHistory, DecayParams};
use crate::git_history;

/// Where initial base levels come from. Decided once, at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryMode {
    /// Commit times from `git blame`.
    GitBlame,
    /// Every chunk starts at the neutral base level.
    Neutral { reason: &'static str },
}

/// Which path produced an activation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    /// No recorded accesses; the stored base level is used as-is.
    StoredBaseLevel,
    /// Decay over the persisted access summary, with the stored base level
    /// folded in as a prior.
    AccessSummary,
}

/// Everything that went into one chunk's activation score.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationBreakdown {
    pub chunk_id: String,
    pub chunk_type: ChunkType,
    pub access_count: u64,
    pub last_access: DateTime<Utc>,
    pub first_access: DateTime<Utc>,
    pub secs_since_last_access: f64,
    pub lifetime_secs: f64,
    pub stored_base_level: f64,
    pub decay_rate: f64,
    pub score: f64,
    pub source: ScoreSource,
}

/// ACT-R activation engine.
#[derive(Debug)]
pub struct ActivationEngine {
    config: ActivationConfig,
    history: HistoryMode,
}

impl ActivationEngine {
    /// Build an engine and decide, once, whether git history is usable.
    pub fn new(config: ActivationConfig) -> Self {
        let history = if !config.git_history {
            HistoryMode::Neutral {
                reason: "disabled by configuration",
            }
        } else if config::git_history_disabled_by_env() {
            HistoryMode::Neutral {
                reason: "disabled by AURORA_SKIP_GIT_HISTORY",
            }
        } else if !git_history::git_available() {
            HistoryMode::Neutral {
                reason: "git executable not found",
            }
        } else {
            HistoryMode::GitBlame
        };

        if let HistoryMode::Neutral { reason } = &history {
            warn!(
                reason,
                base_level = DEFAULT_BASE_LEVEL,
                "recency history unavailable, chunks seed with neutral base level"
            );
        }

        Self { config, history }
    }

    pub fn config(&self) -> &ActivationConfig {
        &self.config
    }

    pub fn history_mode(&self) -> &HistoryMode {
        &self.history
    }

    pub fn decay_rate_for(&self, chunk_type: ChunkType) -> f64 {
        self.config.decay_rate_for(chunk_type)
    }

    pub fn params_for(&self, chunk_type: ChunkType) -> DecayParams {
        DecayParams::for_type(&self.config, chunk_type)
    }

    /// Decay an arbitrary history with this engine's settings for `chunk_type`.
    pub fn calculate(&self, history: &AccessHistory, chunk_type: ChunkType, now: DateTime<Utc>) -> f64 {
        calculate_decay(history, &self.params_for(chunk_type), now)
    }

    /// Query-time activation for a chunk.
    ///
    /// With no recorded accesses the stored base level is returned unchanged.
    /// Otherwise the access summary is decayed with the type's rate and the
    /// stored base level (seed plus reinforcement deltas) enters as one more
    /// term of the sum, see [`with_prior`].
    pub fn activation_score(&self, stats: &AccessStats, chunk_type: ChunkType, now: DateTime<Utc>) -> f64 {
        self.score_with_source(stats, chunk_type, now).0
    }

    fn score_with_source(
        &self,
        stats: &AccessStats,
        chunk_type: ChunkType,
        now: DateTime<Utc>,
    ) -> (f64, ScoreSource) {
        if stats.access_count == 0 {
            return (stats.base_level, ScoreSource::StoredBaseLevel);
        }
        let history = AccessHistory::Summary {
            access_count: stats.access_count,
            first_access: stats.first_access,
            last_access: stats.last_access,
        };
        let recency = self.calculate(&history, chunk_type, now);
        (with_prior(stats.base_level, recency), ScoreSource::AccessSummary)
    }

    /// Initial base level for a chunk about to be stored.
    ///
    /// Uses commit times of the chunk's line range when git history is
    /// available; otherwise, or when the file has no history, the neutral
    /// default.
    pub fn initial_base_level(&self, chunk: &Chunk, now: DateTime<Utc>) -> f64 {
        if self.history != HistoryMode::GitBlame || chunk.content.file_path.is_empty() {
            return DEFAULT_BASE_LEVEL;
        }
        let c = &chunk.content;
        match git_history::blame_timestamps(Path::new(&c.file_path), c.line_start, c.line_end) {
            Some(times) => {
                let commits = times.len();
                let level = self.calculate(&AccessHistory::Timestamps(times), chunk.chunk_type, now);
                debug!(chunk_id = %chunk.id, commits, level, "base level from git history");
                level
            }
            None => {
                debug!(chunk_id = %chunk.id, "no git history for chunk, using neutral base level");
                DEFAULT_BASE_LEVEL
            }
        }
    }

    /// Save a chunk with a history-derived initial base level.
    pub fn seed_chunk(&self, store: &dyn IChunkStore, chunk: &Chunk) -> AuroraResult<f64> {
        let level = self.initial_base_level(chunk, Utc::now());
        store.save_chunk_seeded(chunk, level)?;
        Ok(level)
    }

    /// Explain a stored chunk's activation. `None` if the chunk does not exist.
    pub fn explain_activation(
        &self,
        store: &dyn IChunkStore,
        chunk_id: &str,
        now: DateTime<Utc>,
    ) -> AuroraResult<Option<ActivationBreakdown>> {
        let Some(chunk) = store.get_chunk(chunk_id)? else {
            return Ok(None);
        };
        let stats = store.get_access_stats_batch(&[chunk_id.to_string()])?;
        let Some(stats) = stats.get(chunk_id) else {
            return Ok(None);
        };

        let (score, source) = self.score_with_source(stats, chunk.chunk_type, now);
        let secs = |at: DateTime<Utc>| ((now - at).num_milliseconds() as f64 / 1_000.0).max(0.0);

        Ok(Some(ActivationBreakdown {
            chunk_id: chunk_id.to_string(),
            chunk_type: chunk.chunk_type,
            access_count: stats.access_count,
            last_access: stats.last_access,
            first_access: stats.first_access,
            secs_since_last_access: secs(stats.last_access),
            lifetime_secs: secs(stats.first_access),
            stored_base_level: stats.base_level,
            decay_rate: self.decay_rate_for(chunk.chunk_type),
            score,
            source,
        }))
    }
}

impl Default for ActivationEngine {
    fn default() -> Self {
        Self::new(ActivationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_core::config::DecayPreset;

    fn neutral(config: ActivationConfig) -> ActivationEngine {
        ActivationEngine::new(ActivationConfig {
            git_history: false,
            ..config
        })
    }

    #[test]
    fn disabled_history_is_neutral() {
        let engine = neutral(ActivationConfig::default());
        assert!(matches!(engine.history_mode(), HistoryMode::Neutral { .. }));
        let chunk = Chunk::new("c", ChunkType::Code, Default::default());
        assert_eq!(engine.initial_base_level(&chunk, Utc::now()), DEFAULT_BASE_LEVEL);
    }

    #[test]
    fn type_overrides_apply_on_top_of_preset() {
        let engine = neutral(ActivationConfig::with_preset(DecayPreset::Aggressive));
        assert_eq!(engine.decay_rate_for(ChunkType::Code), 0.7);
        assert_eq!(engine.decay_rate_for(ChunkType::Doc), 0.7);
        assert_eq!(engine.decay_rate_for(ChunkType::Kb), 0.4);
        assert_eq!(engine.decay_rate_for(ChunkType::Reas), 0.6);
    }

    #[test]
    fn zero_accesses_use_stored_base_level() {
        let engine = neutral(ActivationConfig::default());
        let now = Utc::now();
        let stats = AccessStats {
            access_count: 0,
            last_access: now,
            first_access: now,
            base_level: -2.5,
        };
        assert_eq!(engine.activation_score(&stats, ChunkType::Code, now), -2.5);
    }

    #[test]
    fn stored_base_level_orders_equal_histories() {
        let engine = neutral(ActivationConfig::default());
        let now = Utc::now();
        let at = now - chrono::Duration::seconds(30);
        let stats = |base_level| AccessStats {
            access_count: 1,
            last_access: at,
            first_access: at,
            base_level,
        };
        let hot = engine.activation_score(&stats(5.0), ChunkType::Code, now);
        let neutral_level = engine.activation_score(&stats(DEFAULT_BASE_LEVEL), ChunkType::Code, now);
        let cold = engine.activation_score(&stats(-5.0), ChunkType::Code, now);
        assert!(hot > neutral_level && neutral_level > cold);
    }

    #[test]
    fn recent_access_beats_old_access() {
        let engine = neutral(ActivationConfig::default());
        let now = Utc::now();
        let fresh = AccessStats {
            access_count: 1,
            last_access: now - chrono::Duration::seconds(5),
            first_access: now - chrono::Duration::seconds(5),
            base_level: 0.5,
        };
        let stale = AccessStats {
            last_access: now - chrono::Duration::days(10),
            first_access: now - chrono::Duration::days(10),
            ..fresh.clone()
        };
        assert!(
            engine.activation_score(&fresh, ChunkType::Code, now)
                > engine.activation_score(&stale, ChunkType::Code, now)
        );
    }
}
