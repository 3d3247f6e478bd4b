// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "aurora.db";
pub const DEFAULT_CACHE_SIZE: i64 = -64_000; // 64 MB (negative = KB)
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_FULL_TEXT_SEARCH: bool = true;

// --- Activation ---
pub const DEFAULT_DECAY_RATE: f64 = 0.5; // ACT-R standard d
pub const AGGRESSIVE_DECAY_RATE: f64 = 0.7;
pub const GENTLE_DECAY_RATE: f64 = 0.3;
pub const KB_DECAY_RATE: f64 = 0.4;
pub const REAS_DECAY_RATE: f64 = 0.6;
pub const DEFAULT_MAX_HISTORY: usize = 100;
pub const DEFAULT_MIN_ELAPSED_SECS: f64 = 1.0;
pub const DEFAULT_MIN_ACTIVATION: f64 = -10.0;
pub const DEFAULT_GIT_HISTORY: bool = true;

// --- Keyword index ---
pub const DEFAULT_BM25_K1: f64 = 1.5;
pub const DEFAULT_BM25_B: f64 = 0.75;
pub const DEFAULT_MIN_TOKEN_LEN: usize = 2;
pub const SNAPSHOT_SUFFIX: &str = ".bm25.json";

// --- Retrieval ---
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.3;
pub const DEFAULT_ACTIVATION_WEIGHT: f64 = 0.3;
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.4;
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_CANDIDATE_LIMIT: usize = 100;
pub const DEFAULT_ACTIVATION_CANDIDATES: usize = 100;
pub const DEFAULT_KEYWORD_CANDIDATES: usize = 50;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "none";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_EMBEDDING_CACHE_SIZE: u64 = 10_000;
pub const DEFAULT_EMBEDDING_CACHE_IDLE_SECS: u64 = 3_600;
pub const DEFAULT_EMBEDDING_CACHE_TTL_SECS: u64 = 86_400;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
