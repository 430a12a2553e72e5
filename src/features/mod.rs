// Precomputed document features and their similarity metrics.
//
// Two feature classes exist: n-gram shingle sets and dependency-relation
// multisets. Each has its own on-disk format (`.NGram` / `.dep`, plain
// UTF-8 text with `~`-joined fields) and its own similarity formula. The
// `Feature` enum is the closed set of variants the scoring pipeline works
// with; it never inspects classes ad hoc.

pub mod dependency;
pub mod ngram;

use std::fmt;
use std::path::Path;

pub use dependency::{DepRelation, DependencyFeature};
pub use ngram::{Coefficient, NGramFeature};

use crate::error::{CribError, Result};

/// Iterate the content lines of a serialized feature file.
///
/// Tolerates a UTF-8 BOM (the upstream preprocessor writes one) and skips
/// blank lines such as a trailing newline.
pub(crate) fn read_feature_lines(text: &str) -> impl Iterator<Item = &str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.lines().filter(|line| !line.is_empty())
}

/// The two feature classes a catalog entry can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureClass {
    NGram,
    Dependency,
}

impl FeatureClass {
    /// File extension of serialized features of this class.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::NGram => "NGram",
            Self::Dependency => "dep",
        }
    }
}

impl fmt::Display for FeatureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NGram => write!(f, "ngram"),
            Self::Dependency => write!(f, "dependency"),
        }
    }
}

/// A loaded feature of either class, with a uniform similarity entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    NGram(NGramFeature),
    Dependency(DependencyFeature),
}

impl Feature {
    /// Load a serialized feature file of the given class.
    pub fn load(class: FeatureClass, path: &Path) -> Result<Self> {
        match class {
            FeatureClass::NGram => NGramFeature::load(path).map(Self::NGram),
            FeatureClass::Dependency => DependencyFeature::load(path).map(Self::Dependency),
        }
    }

    /// Compute the similarity against another feature of the same class.
    ///
    /// `coefficient` selects the n-gram formula and is ignored for
    /// dependency features. Comparing different classes fails with
    /// `MixedFeatureKinds`.
    pub fn similarity(&self, other: &Feature, coefficient: Coefficient) -> Result<f64> {
        match (self, other) {
            (Self::NGram(a), Self::NGram(b)) => a.similarity(b, coefficient),
            (Self::Dependency(a), Self::Dependency(b)) => a.similarity(b),
            _ => Err(CribError::MixedFeatureKinds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_kinds_rejected() {
        let ngram = Feature::NGram(NGramFeature::from_tokens(&["a", "b"], 2).unwrap());
        let dep = Feature::Dependency(DependencyFeature::new(vec![DepRelation::new(
            "a", "root", "root",
        )]));
        assert!(matches!(
            ngram.similarity(&dep, Coefficient::Jaccard),
            Err(CribError::MixedFeatureKinds)
        ));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(FeatureClass::NGram.extension(), "NGram");
        assert_eq!(FeatureClass::Dependency.extension(), "dep");
    }
}
