use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted activation state. Exactly one per chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationRecord {
    pub chunk_id: String,
    /// Output of the decay model (or the neutral seed).
    pub base_level: f64,
    pub last_access: DateTime<Utc>,
    pub access_count: u64,
}

/// Access statistics consumed by the activation engine at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessStats {
    pub access_count: u64,
    pub last_access: DateTime<Utc>,
    /// First known access, which is the chunk's creation time.
    pub first_access: DateTime<Utc>,
    pub base_level: f64,
}
