// Error taxonomy for the crib library.
//
// Configuration problems (catalog mismatches, bad coefficients, bad n-gram
// orders) are surfaced before any pair work starts. Feature-file problems
// are attached to the pair that hit them so the pipeline can decide whether
// to abort or skip.

use std::path::PathBuf;

use thiserror::Error;

/// A specialized Result type for crib operations.
pub type Result<T, E = CribError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CribError {
    /// An n-gram shingle width below 1 makes no sense.
    #[error("n-gram order must be at least 1, got {0}")]
    InvalidOrder(usize),

    /// The similarity coefficient name is outside the supported set.
    #[error("unknown similarity coefficient `{0}` (expected `jaccard` or `containment`)")]
    UnknownCoefficient(String),

    /// Similarity on an empty feature set would divide by zero.
    #[error("similarity is undefined for an empty feature set")]
    EmptyFeatureSet,

    /// An n-gram feature was compared against a dependency feature (or
    /// vice versa).
    #[error("cannot compare features of different kinds")]
    MixedFeatureKinds,

    /// A serialized feature file that does not follow the `~`-delimited
    /// format. `line` is 1-based.
    #[error("malformed feature file {path}: line {line}: {reason}")]
    MalformedFeatureFile {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A feature or annotation file expected on disk is absent.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// The features directory layout is inconsistent (unpaired kind
    /// directories, unequal file counts, or a root that is not a directory).
    #[error("feature catalog mismatch: {0}")]
    CatalogMismatch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CribError {
    pub(crate) fn malformed(
        path: impl Into<PathBuf>,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedFeatureFile {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}
