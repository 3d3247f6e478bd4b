use std::collections::HashSet;

use aurora_core::ChunkType;
use test_fixtures::*;

#[test]
fn golden_corpus_loads_with_unique_valid_ids() {
    let corpus = golden_corpus();
    assert!(corpus.len() >= 8);
    let ids: HashSet<_> = corpus.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids.len(), corpus.len());
    for chunk in &corpus {
        chunk.validate().expect("golden chunk must validate");
    }
}

#[test]
fn golden_queries_reference_corpus_ids() {
    let ids: HashSet<_> = golden_corpus().into_iter().map(|c| c.id).collect();
    for q in golden_queries() {
        for id in q.expected_top.iter().chain(q.absent.iter()) {
            assert!(ids.contains(id), "query {:?} references unknown id {id}", q.query);
        }
    }
}

#[test]
fn builder_sets_every_field() {
    let chunk = ChunkBuilder::new("x", ChunkType::Code)
        .name("parseConfig")
        .signature("fn parse_config()")
        .body("reads toml")
        .docstring("Parse configuration.")
        .lines(3, 9)
        .embedding(vec![1.0, 0.0])
        .meta("lang", serde_json::json!("rust"))
        .build();
    assert_eq!(chunk.content.name, "parseConfig");
    assert_eq!(chunk.content.line_start, 3);
    assert_eq!(chunk.embedding.as_deref(), Some(&[1.0f32, 0.0][..]));
    assert_eq!(chunk.metadata["lang"], "rust");
}

#[test]
fn synthetic_corpus_is_deterministic() {
    let a = synthetic_corpus(20);
    let b = synthetic_corpus(20);
    assert_eq!(a.len(), 20);
    assert!(a.iter().zip(&b).all(|(x, y)| x.content_eq(y)));
}
