pub mod activation_ops;
pub mod chunk_crud;
pub mod chunk_search;
pub mod maintenance;
pub mod relationship_ops;
