/// Aurora engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Neutral base level assigned when no access history can be derived.
pub const DEFAULT_BASE_LEVEL: f64 = 0.5;

/// Access count written with a freshly saved chunk's activation row.
pub const SEED_ACCESS_COUNT: u64 = 1;

/// Current schema version. Bumped with every migration.
pub const SCHEMA_VERSION: u32 = 3;

/// Maximum number of ids bound into a single `IN (...)` query.
pub const MAX_BATCH_PARAMS: usize = 500;

/// Identity string used for every in-memory store.
pub const IN_MEMORY_IDENTITY: &str = ":memory:";
