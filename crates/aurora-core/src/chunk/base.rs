use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::chunk_type::ChunkType;
use crate::errors::ValidationError;

/// Structured content of a chunk: the symbol or section plus where it came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChunkContent {
    /// Symbol or section name.
    pub name: String,
    /// Function/method signature, when the chunk is a code symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Body text (source, section text, or reasoning trace).
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    pub file_path: String,
    pub line_start: u32,
    pub line_end: u32,
    pub language: String,
}

/// The atomic indexed unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable unique key.
    pub id: String,
    pub chunk_type: ChunkType,
    pub content: ChunkContent,
    /// Optional fixed-dimension vector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Open key/value map.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chunk {
    /// Create a chunk stamped with the current time and empty metadata.
    pub fn new(id: impl Into<String>, chunk_type: ChunkType, content: ChunkContent) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            chunk_type,
            content,
            embedding: None,
            metadata: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Attach metadata. The value must be a JSON object.
    pub fn with_metadata(mut self, metadata: Value) -> Result<Self, ValidationError> {
        match metadata {
            Value::Object(map) => {
                self.metadata = map;
                Ok(self)
            }
            other => Err(ValidationError::InvalidMetadata {
                reason: format!("expected a JSON object, got {other}"),
            }),
        }
    }

    /// Check the invariants every persisted chunk must satisfy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.content.line_start > self.content.line_end {
            return Err(ValidationError::InvalidLineRange {
                start: self.content.line_start,
                end: self.content.line_end,
            });
        }
        if let Some(embedding) = &self.embedding {
            if let Some(index) = embedding.iter().position(|v| !v.is_finite()) {
                return Err(ValidationError::NonFiniteEmbedding { index });
            }
        }
        Ok(())
    }

    /// Text used for keyword indexing and embedding: name, signature,
    /// body and docstring, newline-separated.
    pub fn searchable_text(&self) -> String {
        let c = &self.content;
        let mut parts: Vec<&str> = Vec::with_capacity(4);
        parts.push(&c.name);
        if let Some(sig) = &c.signature {
            parts.push(sig);
        }
        parts.push(&c.body);
        if let Some(doc) = &c.docstring {
            parts.push(doc);
        }
        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// blake3 hash of the searchable text, used as an embedding cache key.
    pub fn content_hash(&self) -> String {
        blake3::hash(self.searchable_text().as_bytes())
            .to_hex()
            .to_string()
    }

    /// Compare every persisted field except the timestamps.
    pub fn content_eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.chunk_type == other.chunk_type
            && self.content == other.content
            && self.embedding == other.embedding
            && self.metadata == other.metadata
    }
}

/// Identity equality: two chunks are equal if they have the same id.
/// For field-level comparison use [`Chunk::content_eq`].
impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
