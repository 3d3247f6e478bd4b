//! Chunk builders, corpus seeding, and golden fixtures shared by the
//! Aurora crates' tests and benches.

mod git_repo;
mod memory_corpus;
mod staging;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use aurora_core::chunk::{Chunk, ChunkContent, ChunkType};
use aurora_core::errors::AuroraResult;
use aurora_core::traits::IChunkStore;

pub use git_repo::GitRepo;
pub use memory_corpus::MemoryCorpus;
pub use staging::stage_activation;

/// Directory holding the golden JSON files.
fn golden_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("golden")
}

/// Load and deserialize a golden fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = golden_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    golden_root().join(relative_path).exists()
}

/// A chunk as written in the golden corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldenChunk {
    pub id: String,
    #[serde(rename = "type")]
    pub chunk_type: ChunkType,
    pub name: String,
    #[serde(default)]
    pub signature: Option<String>,
    pub body: String,
    #[serde(default)]
    pub docstring: Option<String>,
    #[serde(default)]
    pub file_path: String,
}

impl GoldenChunk {
    pub fn to_chunk(&self) -> Chunk {
        let mut c = ChunkBuilder::new(&self.id, self.chunk_type)
            .name(&self.name)
            .body(&self.body)
            .file_path(&self.file_path);
        if let Some(sig) = &self.signature {
            c = c.signature(sig);
        }
        if let Some(doc) = &self.docstring {
            c = c.docstring(doc);
        }
        c.build()
    }
}

/// A query with the ids expected at the head of the ranking.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldenQuery {
    pub query: String,
    pub expected_top: Vec<String>,
    #[serde(default)]
    pub absent: Vec<String>,
}

/// The golden corpus.
pub fn golden_corpus() -> Vec<Chunk> {
    let chunks: Vec<GoldenChunk> = load_fixture("corpus.json");
    chunks.iter().map(GoldenChunk::to_chunk).collect()
}

/// Queries with known-good answers over [`golden_corpus`].
pub fn golden_queries() -> Vec<GoldenQuery> {
    load_fixture("queries.json")
}

/// Fluent chunk construction for tests.
#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    id: String,
    chunk_type: ChunkType,
    content: ChunkContent,
    embedding: Option<Vec<f32>>,
    metadata: serde_json::Map<String, serde_json::Value>,
}

impl ChunkBuilder {
    pub fn new(id: &str, chunk_type: ChunkType) -> Self {
        let language = match chunk_type {
            ChunkType::Code => "rust",
            _ => "markdown",
        };
        Self {
            id: id.to_string(),
            chunk_type,
            content: ChunkContent {
                name: id.to_string(),
                file_path: format!("src/{id}.rs"),
                line_start: 1,
                line_end: 10,
                language: language.to_string(),
                ..ChunkContent::default()
            },
            embedding: None,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.content.name = name.to_string();
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.content.signature = Some(signature.to_string());
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.content.body = body.to_string();
        self
    }

    pub fn docstring(mut self, docstring: &str) -> Self {
        self.content.docstring = Some(docstring.to_string());
        self
    }

    pub fn file_path(mut self, path: &str) -> Self {
        if !path.is_empty() {
            self.content.file_path = path.to_string();
        }
        self
    }

    pub fn lines(mut self, start: u32, end: u32) -> Self {
        self.content.line_start = start;
        self.content.line_end = end;
        self
    }

    pub fn embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn meta(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Chunk {
        let mut chunk = Chunk::new(self.id, self.chunk_type, self.content);
        chunk.embedding = self.embedding;
        chunk.metadata = self.metadata;
        chunk
    }
}

/// A code chunk with the given symbol name and body.
pub fn code_chunk(id: &str, name: &str, body: &str) -> Chunk {
    ChunkBuilder::new(id, ChunkType::Code).name(name).body(body).build()
}

/// A documentation chunk.
pub fn doc_chunk(id: &str, title: &str, body: &str) -> Chunk {
    ChunkBuilder::new(id, ChunkType::Doc)
        .name(title)
        .body(body)
        .file_path(&format!("docs/{id}.md"))
        .build()
}

/// A reasoning-trace chunk.
pub fn reas_chunk(id: &str, body: &str) -> Chunk {
    ChunkBuilder::new(id, ChunkType::Reas)
        .name(id)
        .body(body)
        .file_path(&format!("traces/{id}.md"))
        .build()
}

/// A chunk with a random id, for property tests.
pub fn random_chunk(chunk_type: ChunkType, body: &str) -> Chunk {
    let id = uuid::Uuid::new_v4().to_string();
    ChunkBuilder::new(&id, chunk_type).body(body).build()
}

/// `n` code chunks `chunk-00000..` with distinct bodies.
pub fn synthetic_corpus(n: usize) -> Vec<Chunk> {
    (0..n)
        .map(|i| {
            code_chunk(
                &format!("chunk-{i:05}"),
                &format!("handler{i}"),
                &format!("fn handler{i}() {{ process_item({i}); emit_metric(\"h{}\"); }}", i % 17),
            )
        })
        .collect()
}

/// Save every chunk into `store`.
pub fn seed_corpus(store: &dyn IChunkStore, chunks: &[Chunk]) -> AuroraResult<()> {
    for chunk in chunks {
        store.save_chunk(chunk)?;
    }
    Ok(())
}
