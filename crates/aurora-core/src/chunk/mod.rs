pub mod activation;
pub mod base;
pub mod chunk_type;
pub mod identity;
pub mod relationships;

pub use activation::{AccessStats, ActivationRecord};
pub use base::{Chunk, ChunkContent};
pub use chunk_type::ChunkType;
pub use identity::StoreIdentity;
pub use relationships::Relationship;
