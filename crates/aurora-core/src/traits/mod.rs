mod chunk_store;
mod embedding;

pub use chunk_store::IChunkStore;
pub use embedding::IEmbeddingSource;
