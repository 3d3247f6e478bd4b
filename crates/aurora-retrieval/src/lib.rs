//! # aurora-retrieval
//!
//! Hybrid retrieval over a chunk store. Three signals are computed per
//! candidate, min-max normalized across the candidate set, and fused with
//! fixed weights:
//!
//! - keyword: BM25 over the candidates
//! - activation: ACT-R base level from access statistics
//! - semantic: cosine similarity, only when an embedding source is available
//!
//! Without a usable embedding source the retriever runs dual-hybrid.

pub mod engine;
pub mod ranking;
pub mod results;
pub mod search;
pub mod signals;
pub mod tracing_setup;

pub use engine::HybridRetriever;
pub use results::{RankedResult, RawScores};
pub use signals::ActiveSignals;
