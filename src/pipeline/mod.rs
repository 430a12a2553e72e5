// The pairwise scoring pipeline.
//
// `pairs` builds the cross product and computes one score row at a time,
// `engine` runs the bounded fan-out over blocking workers, and `writer`
// is the single task allowed to touch the output table.

pub mod engine;
pub mod pairs;
pub mod writer;

pub use engine::{write_scores, PairErrorPolicy, RunSummary, ScoreOptions};
pub use pairs::{list_corpus, PairFailure, PairScore};
