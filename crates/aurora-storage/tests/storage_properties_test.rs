//! Property tests: save→get roundtrip and activation invariants.

use proptest::prelude::*;

use aurora_core::chunk::ChunkType;
use aurora_core::traits::IChunkStore;
use aurora_storage::ChunkStore;
use test_fixtures::ChunkBuilder;

fn chunk_type() -> impl Strategy<Value = ChunkType> {
    prop_oneof![
        Just(ChunkType::Code),
        Just(ChunkType::Kb),
        Just(ChunkType::Doc),
        Just(ChunkType::Reas),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_save_get_roundtrip(
        id in "[a-z][a-z0-9:_-]{0,30}",
        ty in chunk_type(),
        name in "[a-zA-Z_][a-zA-Z0-9_]{0,20}",
        body in "\\PC{0,200}",
        start in 0u32..500,
        span in 0u32..50,
        embedding in proptest::option::of(proptest::collection::vec(-10.0f32..10.0, 1..16)),
    ) {
        let store = ChunkStore::open_in_memory();
        let mut builder = ChunkBuilder::new(&id, ty).name(&name).body(&body).lines(start, start + span);
        if let Some(e) = embedding {
            builder = builder.embedding(e);
        }
        let chunk = builder.build();

        store.save_chunk(&chunk).unwrap();
        let loaded = store.get_chunk(&id).unwrap().unwrap();
        prop_assert!(loaded.content_eq(&chunk));
        prop_assert!(store.get_activation(&id).unwrap().unwrap().access_count >= 1);
    }

    #[test]
    fn prop_access_count_never_decreases(deltas in proptest::collection::vec(-5.0f64..5.0, 1..20)) {
        let store = ChunkStore::open_in_memory();
        store.save_chunk(&ChunkBuilder::new("c", ChunkType::Code).build()).unwrap();
        let mut last = store.get_activation("c").unwrap().unwrap().access_count;
        for delta in deltas {
            store.update_activation("c", delta).unwrap();
            store.save_chunk(&ChunkBuilder::new("c", ChunkType::Code).build()).unwrap();
            let now = store.get_activation("c").unwrap().unwrap().access_count;
            prop_assert!(now >= last);
            last = now;
        }
    }
}
