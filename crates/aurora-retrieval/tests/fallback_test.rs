//! Retrieval without full-text search: activation candidates plus the
//! persisted keyword index.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;

use aurora_core::config::{KeywordConfig, RetrievalConfig, StorageConfig};
use aurora_core::traits::IChunkStore;
use aurora_retrieval::HybridRetriever;
use aurora_storage::ChunkStore;
use test_fixtures::{code_chunk, doc_chunk, golden_corpus, seed_corpus, MemoryCorpus, stage_activation};

fn store_without_fts(path: &Path) -> Arc<ChunkStore> {
    Arc::new(ChunkStore::open_with_config(StorageConfig {
        db_path: path.display().to_string(),
        full_text_search: false,
        ..StorageConfig::default()
    }))
}

fn narrow_config() -> RetrievalConfig {
    RetrievalConfig {
        activation_candidates: 5,
        ..RetrievalConfig::default()
    }
}

#[test]
fn unaccessed_keyword_match_is_recalled_by_the_keyword_index() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_without_fts(&dir.path().join("fallback.db"));
    for i in 0..30 {
        store
            .save_chunk_seeded(&code_chunk(&format!("busy-{i:02}"), "handler", "routine work"), 2.0)
            .unwrap();
    }
    store
        .save_chunk(&doc_chunk("doc:quokka", "Quokka notes", "the quokka lives on rottnest"))
        .unwrap();
    store
        .with_conn(|conn| stage_activation(conn, "doc:quokka", -8.0, 0, Utc::now()))
        .unwrap();

    let retriever = HybridRetriever::new(store.clone(), None, narrow_config());
    let index = retriever.keyword_index().expect("file stores persist the keyword index");
    assert!(!index.is_loaded());

    let results = retriever.retrieve("quokka", 10, None).unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r.chunk_id.as_str()).collect();
    assert!(ids.contains(&"doc:quokka"), "{ids:?}");
    assert_eq!(results.len(), 6);
    let quokka = results.iter().find(|r| r.chunk_id == "doc:quokka").unwrap();
    assert_eq!(quokka.bm25_score, 1.0);
    assert_eq!(quokka.raw.activation, -8.0);

    assert!(index.is_loaded());
    assert_eq!(index.load_count(), 1);
    assert!(dir.path().join("fallback.db.bm25.json").exists());
}

#[test]
fn keyword_index_follows_corpus_changes() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_without_fts(&dir.path().join("changes.db"));
    seed_corpus(store.as_ref(), &golden_corpus()).unwrap();

    let retriever = HybridRetriever::new(store.clone(), None, narrow_config());
    retriever.retrieve("token", 10, None).unwrap();
    assert_eq!(retriever.keyword_index().unwrap().load_count(), 1);

    retriever.retrieve("session", 10, None).unwrap();
    assert_eq!(retriever.keyword_index().unwrap().load_count(), 1);

    store
        .save_chunk(&code_chunk("code:new:wombat", "wombat_burrow", "dig a burrow"))
        .unwrap();
    let results = retriever.retrieve("wombat", 10, None).unwrap();
    assert!(results.iter().any(|r| r.chunk_id == "code:new:wombat"));
    assert_eq!(retriever.keyword_index().unwrap().load_count(), 2);
}

#[test]
fn snapshot_is_reused_by_a_new_retriever() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reuse.db");
    let store = store_without_fts(&path);
    seed_corpus(store.as_ref(), &golden_corpus()).unwrap();

    HybridRetriever::new(store.clone(), None, narrow_config())
        .retrieve("server", 5, None)
        .unwrap();

    let snapshot = dir.path().join("reuse.db.bm25.json");
    let written = std::fs::metadata(&snapshot).unwrap().modified().unwrap();

    let second = HybridRetriever::new(store.clone(), None, narrow_config());
    let results = second.retrieve("server", 5, None).unwrap();
    assert_eq!(results[0].chunk_id, "code:http:server");
    assert_eq!(second.keyword_index().unwrap().load_count(), 1);
    assert_eq!(std::fs::metadata(&snapshot).unwrap().modified().unwrap(), written);
}

#[test]
fn memory_store_without_snapshot_path_has_no_keyword_index() {
    let store = Arc::new(MemoryCorpus::with_chunks(&golden_corpus()));
    let retriever = HybridRetriever::new(store.clone(), None, RetrievalConfig::default());
    assert!(retriever.keyword_index().is_none());

    let results = retriever.retrieve("validate token", 3, None).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].chunk_id, "code:auth:validate_token");
    assert_eq!(store.scan_count(), 0);
}

#[test]
fn explicit_snapshot_path_enables_persistence_for_memory_stores() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("memory.bm25.json");
    let store = Arc::new(MemoryCorpus::with_chunks(&golden_corpus()));
    let config = RetrievalConfig {
        activation_candidates: 2,
        keyword: KeywordConfig {
            snapshot_path: Some(snapshot.display().to_string()),
            ..KeywordConfig::default()
        },
        ..RetrievalConfig::default()
    };
    let retriever = HybridRetriever::new(store.clone(), None, config);
    assert_eq!(store.scan_count(), 0);

    let results = retriever.retrieve("rate limits", 3, None).unwrap();
    assert_eq!(results[0].chunk_id, "kb:faq:rate_limits");
    assert_eq!(store.scan_count(), 1);
    assert!(snapshot.exists());
}

#[test]
fn persistence_can_be_switched_off() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_without_fts(&dir.path().join("off.db"));
    let config = RetrievalConfig {
        keyword: KeywordConfig {
            persist: false,
            ..KeywordConfig::default()
        },
        ..RetrievalConfig::default()
    };
    let retriever = HybridRetriever::new(store, None, config);
    assert!(retriever.keyword_index().is_none());
}
