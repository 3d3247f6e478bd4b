//! Save/get/delete semantics and cascades.

use aurora_core::chunk::{ChunkType, Relationship};
use aurora_core::errors::{AuroraError, ValidationError};
use aurora_core::traits::IChunkStore;
use aurora_storage::ChunkStore;
use test_fixtures::{code_chunk, doc_chunk, ChunkBuilder};

#[test]
fn save_then_get_returns_equal_chunk_with_activation_row() {
    let store = ChunkStore::open_in_memory();
    let chunk = ChunkBuilder::new("c1", ChunkType::Code)
        .name("parseConfig")
        .signature("fn parse_config(path: &Path) -> Config")
        .body("let raw = std::fs::read_to_string(path)?;")
        .docstring("Parse the config file.")
        .lines(4, 12)
        .embedding(vec![0.5, -0.25, 1.0])
        .meta("lang", serde_json::json!("rust"))
        .build();

    store.save_chunk(&chunk).unwrap();

    let loaded = store.get_chunk("c1").unwrap().expect("chunk present");
    assert!(loaded.content_eq(&chunk), "loaded {loaded:?} != saved {chunk:?}");

    let act = store.get_activation("c1").unwrap().expect("activation row");
    assert!(act.access_count >= 1);
    assert_eq!(act.base_level, 0.5);
}

#[test]
fn get_missing_chunk_is_none() {
    let store = ChunkStore::open_in_memory();
    assert!(store.get_chunk("nope").unwrap().is_none());
}

#[test]
fn identical_resave_is_idempotent_and_keeps_access_count() {
    let store = ChunkStore::open_in_memory();
    let chunk = code_chunk("c1", "alpha", "body one");
    store.save_chunk(&chunk).unwrap();
    store.save_chunk(&code_chunk("c2", "beta", "body")).unwrap();
    store.add_relationship(&Relationship::new("c1", "c2", "calls", 1.0)).unwrap();
    store.update_activation("c1", 0.25).unwrap();
    let before = store.get_activation("c1").unwrap().unwrap();

    store.save_chunk(&chunk).unwrap();

    assert_eq!(store.chunk_count().unwrap(), 2);
    let after = store.get_activation("c1").unwrap().unwrap();
    assert_eq!(after.access_count, before.access_count);
    assert_eq!(after.base_level, before.base_level);
    assert!(after.last_access >= before.last_access);
    assert_eq!(store.get_relationships("c1").unwrap().len(), 1);
}

#[test]
fn changed_resave_reindexes_and_cascades() {
    let store = ChunkStore::open_in_memory();
    let chunk = code_chunk("a", "alpha", "original walrus body");
    store.save_chunk(&chunk).unwrap();
    store.save_chunk(&code_chunk("b", "beta", "y")).unwrap();
    store.add_relationship(&Relationship::new("a", "b", "calls", 1.0)).unwrap();
    store.add_relationship(&Relationship::new("b", "a", "imports", 0.5)).unwrap();
    store.update_activation("a", 1.0).unwrap();

    let mut reindexed = chunk.clone();
    reindexed.content.body = "rewritten narwhal body".to_string();
    store.save_chunk(&reindexed).unwrap();

    assert_eq!(store.chunk_count().unwrap(), 2);
    assert_eq!(store.get_chunk("a").unwrap().unwrap().content.body, "rewritten narwhal body");
    let act = store.get_activation("a").unwrap().unwrap();
    assert_eq!(act.access_count, 1);
    assert_eq!(act.base_level, 0.5);
    assert!(store.get_relationships("a").unwrap().is_empty());
    assert!(store.get_relationships("b").unwrap().is_empty());

    if store.supports_full_text().unwrap() {
        assert!(store.retrieve_by_fts("walrus", 10).unwrap().unwrap().is_empty());
        let hits = store.retrieve_by_fts("narwhal", 10).unwrap().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
    }
}

#[test]
fn changed_seeded_resave_takes_the_new_seed() {
    let store = ChunkStore::open_in_memory();
    let chunk = code_chunk("a", "alpha", "one");
    store.save_chunk_seeded(&chunk, 3.0).unwrap();
    store.update_activation("a", 0.0).unwrap();

    let mut reindexed = chunk.clone();
    reindexed.content.body = "two".to_string();
    store.save_chunk_seeded(&reindexed, -1.0).unwrap();

    let act = store.get_activation("a").unwrap().unwrap();
    assert_eq!(act.base_level, -1.0);
    assert_eq!(act.access_count, 1);
}

#[test]
fn seeded_save_overwrites_base_level() {
    let store = ChunkStore::open_in_memory();
    let chunk = code_chunk("c1", "alpha", "body");
    store.save_chunk_seeded(&chunk, -1.25).unwrap();
    assert_eq!(store.get_activation("c1").unwrap().unwrap().base_level, -1.25);
    store.save_chunk_seeded(&chunk, 2.0).unwrap();
    assert_eq!(store.get_activation("c1").unwrap().unwrap().base_level, 2.0);
}

#[test]
fn update_activation_adds_delta_and_counts_access() {
    let store = ChunkStore::open_in_memory();
    store.save_chunk(&code_chunk("c1", "alpha", "body")).unwrap();
    store.update_activation("c1", 0.5).unwrap();
    store.update_activation("c1", -0.25).unwrap();
    let act = store.get_activation("c1").unwrap().unwrap();
    assert!((act.base_level - 0.75).abs() < 1e-12);
    assert_eq!(act.access_count, 3);
}

#[test]
fn update_activation_on_missing_chunk_is_not_found() {
    let store = ChunkStore::open_in_memory();
    let err = store.update_activation("ghost", 1.0).unwrap_err();
    assert!(matches!(err, AuroraError::ChunkNotFound { ref id } if id == "ghost"));
}

#[test]
fn delete_cascades_to_activation_and_relationships() {
    let store = ChunkStore::open_in_memory();
    store.save_chunk(&code_chunk("a", "alpha", "x")).unwrap();
    store.save_chunk(&code_chunk("b", "beta", "y")).unwrap();
    store.save_chunk(&code_chunk("c", "gamma", "z")).unwrap();
    store.add_relationship(&Relationship::new("a", "b", "calls", 1.0)).unwrap();
    store.add_relationship(&Relationship::new("c", "a", "imports", 0.5)).unwrap();
    store.add_relationship(&Relationship::new("b", "c", "calls", 0.7)).unwrap();

    assert!(store.delete_chunk("a").unwrap());
    assert!(!store.delete_chunk("a").unwrap());

    assert!(store.get_activation("a").unwrap().is_none());
    let remaining = store.get_relationships("b").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].to_chunk, "c");
    assert!(store.get_relationships("a").unwrap().is_empty());
}

#[test]
fn relationship_requires_existing_endpoints() {
    let store = ChunkStore::open_in_memory();
    store.save_chunk(&code_chunk("a", "alpha", "x")).unwrap();
    let err = store
        .add_relationship(&Relationship::new("a", "missing", "calls", 1.0))
        .unwrap_err();
    assert!(err.is_storage());
}

#[test]
fn invalid_chunks_are_rejected_before_writing() {
    let store = ChunkStore::open_in_memory();

    let empty_id = code_chunk("  ", "x", "y");
    let err = store.save_chunk(&empty_id).unwrap_err();
    assert!(matches!(err, AuroraError::Validation(ValidationError::EmptyId)));

    let bad_lines = ChunkBuilder::new("c", ChunkType::Code).lines(9, 2).build();
    assert!(store.save_chunk(&bad_lines).unwrap_err().is_validation());

    let nan = ChunkBuilder::new("n", ChunkType::Code)
        .embedding(vec![1.0, f32::NAN])
        .build();
    assert!(store.save_chunk(&nan).unwrap_err().is_validation());

    assert_eq!(store.chunk_count().unwrap(), 0);
}

#[test]
fn retrieve_by_activation_orders_and_filters() {
    let store = ChunkStore::open_in_memory();
    store.save_chunk_seeded(&code_chunk("low", "l", "x"), 0.1).unwrap();
    store.save_chunk_seeded(&code_chunk("high", "h", "x"), 0.9).unwrap();
    store.save_chunk_seeded(&doc_chunk("doc", "d", "x"), 0.9).unwrap();
    store.save_chunk_seeded(&code_chunk("neg", "n", "x"), -3.0).unwrap();

    let all = store.retrieve_by_activation(f64::MIN, 10, None).unwrap();
    let ids: Vec<_> = all.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["doc", "high", "low", "neg"]);

    let above = store.retrieve_by_activation(0.0, 10, None).unwrap();
    assert_eq!(above.len(), 3);

    let code_only = store
        .retrieve_by_activation(f64::MIN, 10, Some(ChunkType::Code))
        .unwrap();
    assert!(code_only.iter().all(|c| c.chunk_type == ChunkType::Code));
    assert_eq!(code_only[0].id, "high");

    assert_eq!(store.retrieve_by_activation(f64::MIN, 2, None).unwrap().len(), 2);
}

#[test]
fn access_stats_batch_omits_unknown_ids() {
    let store = ChunkStore::open_in_memory();
    let chunk = code_chunk("a", "alpha", "x");
    store.save_chunk(&chunk).unwrap();
    store.update_activation("a", 0.0).unwrap();

    let stats = store
        .get_access_stats_batch(&["a".to_string(), "ghost".to_string()])
        .unwrap();
    assert_eq!(stats.len(), 1);
    let a = &stats["a"];
    assert_eq!(a.access_count, 2);
    assert!(a.first_access <= a.last_access);
}

#[test]
fn access_stats_batch_spans_parameter_batches() {
    let store = ChunkStore::open_in_memory();
    let corpus = test_fixtures::synthetic_corpus(1_200);
    test_fixtures::seed_corpus(&store, &corpus).unwrap();
    let ids: Vec<String> = corpus.iter().map(|c| c.id.clone()).collect();
    let stats = store.get_access_stats_batch(&ids).unwrap();
    assert_eq!(stats.len(), 1_200);
}

#[test]
fn fingerprint_changes_on_add_update_and_delete() {
    let store = ChunkStore::open_in_memory();
    let empty = store.corpus_fingerprint().unwrap();
    store.save_chunk(&code_chunk("a", "alpha", "x")).unwrap();
    let one = store.corpus_fingerprint().unwrap();
    assert_ne!(empty, one);

    let mut changed = code_chunk("a", "alpha", "a much longer body");
    changed.created_at = store.get_chunk("a").unwrap().unwrap().created_at;
    store.save_chunk(&changed).unwrap();
    let updated = store.corpus_fingerprint().unwrap();
    assert_ne!(one, updated);

    store.delete_chunk("a").unwrap();
    assert_eq!(store.corpus_fingerprint().unwrap(), empty);
}
