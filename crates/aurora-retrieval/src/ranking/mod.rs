//! Normalization and weighted fusion.

pub mod normalize;
pub mod scorer;

pub use normalize::min_max;
pub use scorer::{fuse, FusionWeights, SignalScores};
