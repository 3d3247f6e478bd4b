//! Span definitions for retrieval and index maintenance.

/// Span around one `retrieve` call.
#[macro_export]
macro_rules! retrieval_span {
    ($query:expr, $top_k:expr) => {
        tracing::info_span!("aurora.retrieval", query = %$query, top_k = $top_k)
    };
}

/// Span around a keyword index build over `docs` documents.
#[macro_export]
macro_rules! index_span {
    ($kind:expr, $docs:expr) => {
        tracing::debug_span!("aurora.index", kind = %$kind, docs = $docs)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RETRIEVAL: &str = "aurora.retrieval";
    pub const INDEX: &str = "aurora.index";
}
