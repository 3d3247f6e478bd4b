//! # aurora-activation
//!
//! ACT-R base-level learning: how useful has a chunk been, judged by how
//! often and how recently it was accessed.
//!
//! - [`formula`]: the pure decay equation.
//! - [`ActivationEngine`]: per-type decay rates, query-time scoring,
//!   git-history seeding with a neutral fallback, and explanations.
//! - [`EngineRegistry`]: process-wide engines keyed by store identity.

pub mod engine;
pub mod formula;
pub mod git_history;
pub mod registry;

pub use engine::{ActivationBreakdown, ActivationEngine, HistoryMode, ScoreSource};
pub use formula::{calculate_decay, with_prior, AccessHistory, DecayParams};
pub use registry::{get_cached_engine, EngineRegistry};
