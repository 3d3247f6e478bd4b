//! # aurora-core
//!
//! Foundation crate for the Aurora hybrid retrieval engine.
//! Defines the chunk model, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod chunk;
pub mod config;
pub mod constants;
pub mod errors;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use chunk::{
    AccessStats, ActivationRecord, Chunk, ChunkContent, ChunkType, Relationship, StoreIdentity,
};
pub use config::AuroraConfig;
pub use errors::{AuroraError, AuroraResult};
