use serde::{Deserialize, Serialize};

/// A directed edge between two chunks.
///
/// Stored for a future spreading-activation pass; ranking does not read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Row id, assigned by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub from_chunk: String,
    pub to_chunk: String,
    /// Free-form edge label, e.g. `calls`, `imports`, `derived_from`.
    pub relationship_type: String,
    pub weight: f64,
}

impl Relationship {
    pub fn new(
        from_chunk: impl Into<String>,
        to_chunk: impl Into<String>,
        relationship_type: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            id: None,
            from_chunk: from_chunk.into(),
            to_chunk: to_chunk.into(),
            relationship_type: relationship_type.into(),
            weight,
        }
    }
}
