//! # aurora-keyword
//!
//! BM25 keyword ranking over chunk text.
//!
//! - [`tokenizer`]: splits identifiers (camelCase, snake_case, acronyms) so
//!   code symbols match human queries.
//! - [`Bm25Index`]: the inverted index and scoring function.
//! - [`KeywordIndex`]: the two lifecycles, built per candidate set or
//!   persisted and loaded lazily on first retrieval.

pub mod bm25;
pub mod index;
pub mod snapshot;
pub mod tokenizer;

pub use bm25::Bm25Index;
pub use index::KeywordIndex;
pub use tokenizer::tokenize;
