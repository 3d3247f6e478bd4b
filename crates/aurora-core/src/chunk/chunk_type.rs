use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// The four kinds of indexed content.
///
/// The type is assigned by the caller (usually from a file-extension mapping
/// with a context override); the engine only consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    /// Source code symbol (function, class, method).
    Code,
    /// Knowledge-base entry.
    Kb,
    /// Documentation section.
    Doc,
    /// Generated reasoning trace.
    Reas,
}

impl ChunkType {
    pub const COUNT: usize = 4;

    pub const ALL: [ChunkType; 4] = [Self::Code, Self::Kb, Self::Doc, Self::Reas];

    /// Persisted string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Kb => "kb",
            Self::Doc => "doc",
            Self::Reas => "reas",
        }
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(Self::Code),
            "kb" => Ok(Self::Kb),
            "doc" => Ok(Self::Doc),
            "reas" => Ok(Self::Reas),
            other => Err(ValidationError::InvalidChunkType {
                type_name: other.to_string(),
            }),
        }
    }
}
