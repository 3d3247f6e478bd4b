//! Candidate gathering.

pub mod candidates;

pub use candidates::{gather, CandidateSet, CandidateSource};
