//! Property tests: result bounds, ordering and determinism.

use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;

use aurora_core::config::RetrievalConfig;
use aurora_core::traits::IChunkStore;
use aurora_retrieval::HybridRetriever;
use aurora_storage::ChunkStore;
use test_fixtures::{code_chunk, stage_activation};

const WORDS: &[&str] = &[
    "cache", "token", "parse", "config", "server", "pool", "session", "index", "query", "flush",
];

fn body_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 1..8).prop_map(|w| w.join(" "))
}

fn build_store(bodies: &[String]) -> Arc<ChunkStore> {
    let store = ChunkStore::open_in_memory();
    let at = Utc::now();
    for (i, body) in bodies.iter().enumerate() {
        let id = format!("c{i:03}");
        store.save_chunk(&code_chunk(&id, "item", body)).unwrap();
    }
    store
        .with_conn(|conn| {
            for i in 0..bodies.len() {
                let base = (i % 4) as f64;
                stage_activation(conn, &format!("c{i:03}"), base, 0, at)?;
            }
            Ok(())
        })
        .unwrap();
    Arc::new(store)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn results_bounded_sorted_and_deterministic(
        bodies in prop::collection::vec(body_strategy(), 1..25),
        query in body_strategy(),
        top_k in 0usize..12,
    ) {
        let store = build_store(&bodies);
        let retriever = HybridRetriever::new(store, None, RetrievalConfig::default());

        let first = retriever.retrieve(&query, top_k, None).unwrap();
        prop_assert!(first.len() <= top_k);
        prop_assert!(first.len() <= bodies.len());
        for pair in first.windows(2) {
            let ordered = pair[0].score > pair[1].score
                || (pair[0].score == pair[1].score && pair[0].chunk_id < pair[1].chunk_id);
            prop_assert!(ordered, "{} then {}", pair[0].chunk_id, pair[1].chunk_id);
        }
        for r in &first {
            prop_assert!((0.0..=1.0).contains(&r.bm25_score));
            prop_assert!((0.0..=1.0).contains(&r.activation_score));
            prop_assert!(r.score <= 0.6 + 1e-9);
        }

        let second = retriever.retrieve(&query, top_k, None).unwrap();
        let ids = |rs: &[aurora_retrieval::RankedResult]| {
            rs.iter().map(|r| (r.chunk_id.clone(), r.score)).collect::<Vec<_>>()
        };
        prop_assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn larger_k_extends_smaller_k(
        bodies in prop::collection::vec(body_strategy(), 1..20),
        query in body_strategy(),
    ) {
        let store = build_store(&bodies);
        let count = store.chunk_count().unwrap();
        let retriever = HybridRetriever::new(store, None, RetrievalConfig::default());
        let small = retriever.retrieve(&query, 3, None).unwrap();
        let large = retriever.retrieve(&query, count, None).unwrap();
        let prefix: Vec<_> = large.iter().take(small.len()).map(|r| &r.chunk_id).collect();
        let head: Vec<_> = small.iter().map(|r| &r.chunk_id).collect();
        prop_assert_eq!(prefix, head);
    }
}
