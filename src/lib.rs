// Crib: pairwise feature-similarity scoring for plagiarism detection.
//
// This is the library root. Each module corresponds to one stage of the
// scoring pipeline: feature representations and their similarity metrics,
// catalog discovery over a preprocessed features directory, ground-truth
// annotations, and the concurrent pairwise scoring engine.

pub mod annotations;
pub mod catalog;
pub mod config;
pub mod error;
pub mod features;
pub mod pipeline;
