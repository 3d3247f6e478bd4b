//! EmbeddingEngine: stored vectors, batching, and cache behavior.

use std::sync::Arc;

use aurora_core::config::EmbeddingConfig;
use aurora_core::traits::IEmbeddingSource;
use aurora_core::ChunkType;
use aurora_embeddings::{cosine_similarity, CachePolicy, EmbeddingEngine, HashingEmbeddingSource};
use test_fixtures::{code_chunk, golden_corpus, ChunkBuilder};

fn engine() -> EmbeddingEngine {
    EmbeddingEngine::new(Arc::new(HashingEmbeddingSource::new(64)), CachePolicy::with_capacity(1_000))
}

#[test]
fn stored_embedding_used_when_dimensions_match() {
    let e = engine();
    let stored = vec![0.5f32; 64];
    let chunk = ChunkBuilder::new("c1", ChunkType::Code)
        .body("fn anything() {}")
        .embedding(stored.clone())
        .build();

    assert_eq!(e.chunk_vector(&chunk).unwrap(), stored);
    assert_eq!(e.source_calls(), 0);
}

#[test]
fn stored_embedding_of_wrong_size_is_replaced() {
    let e = engine();
    let chunk = ChunkBuilder::new("c1", ChunkType::Code)
        .body("fn anything() {}")
        .embedding(vec![1.0; 3])
        .build();

    let v = e.chunk_vector(&chunk).unwrap();
    assert_eq!(v.len(), 64);
    assert_eq!(e.source_calls(), 1);
}

#[test]
fn chunk_text_embedded_once() {
    let e = engine();
    let chunk = code_chunk("c1", "parseConfig", "fn parse_config() {}");
    let a = e.chunk_vector(&chunk).unwrap();
    let b = e.chunk_vector(&chunk).unwrap();
    assert_eq!(a, b);
    assert_eq!(e.source_calls(), 1);
}

#[test]
fn batch_only_embeds_misses() {
    let e = engine();
    let corpus = golden_corpus();
    e.chunk_vector(&corpus[0]).unwrap();
    assert_eq!(e.source_calls(), 1);

    let vectors = e.chunk_vectors(&corpus).unwrap();
    assert_eq!(vectors.len(), corpus.len());
    assert_eq!(e.source_calls(), corpus.len());
    for (chunk, vector) in corpus.iter().zip(&vectors) {
        assert_eq!(&e.chunk_vector(chunk).unwrap(), vector);
    }
    assert_eq!(e.source_calls(), corpus.len());
}

#[test]
fn query_closer_to_matching_chunk() {
    let e = EmbeddingEngine::new(Arc::new(HashingEmbeddingSource::new(384)), CachePolicy::with_capacity(1_000));
    let corpus = golden_corpus();
    let query = e.embed_query("connection pool").unwrap();
    let best = corpus
        .iter()
        .max_by(|a, b| {
            let sa = cosine_similarity(&query, &e.chunk_vector(a).unwrap());
            let sb = cosine_similarity(&query, &e.chunk_vector(b).unwrap());
            sa.total_cmp(&sb)
        })
        .unwrap();
    assert_eq!(best.id, "code:db:connection_pool");
}

#[test]
fn engine_is_a_source() {
    let e = EmbeddingEngine::from_config(&EmbeddingConfig {
        provider: "hashing".to_string(),
        dimensions: 48,
        cache_size: 10,
        ..EmbeddingConfig::default()
    })
    .unwrap()
    .unwrap();
    let as_source: &dyn IEmbeddingSource = &e;
    assert_eq!(as_source.name(), "hashing");
    assert_eq!(as_source.dimensions(), 48);
    assert!(as_source.is_available());
    assert_eq!(as_source.embed("x y zz").unwrap().len(), 48);
}

#[test]
fn reindexed_chunk_text_misses_the_cache() {
    let e = engine();
    let chunk = code_chunk("c1", "parseConfig", "fn parse_config() {}");
    e.chunk_vector(&chunk).unwrap();

    let mut renamed = chunk.clone();
    renamed.id = "c2".to_string();
    e.chunk_vector(&renamed).unwrap();
    assert_eq!(e.source_calls(), 1);

    let mut edited = chunk.clone();
    edited.content.body = "fn parse_config(strict: bool) {}".to_string();
    e.chunk_vector(&edited).unwrap();
    assert_eq!(e.source_calls(), 2);
    assert_eq!(e.cache().stats().hits, 1);
}
