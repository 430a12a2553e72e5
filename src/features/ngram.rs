// N-gram shingle features and their set-based similarity coefficients.
//
// A document is represented as the set of its token windows of width
// `order` (stride 1). Two coefficients are supported:
//
//   jaccard(A, B)     = |A ∩ B| / |A ∪ B|      (symmetric)
//   containment(A, B) = |A ∩ B| / |A|          (asymmetric, |A| = self side)
//
// The containment denominator is always the receiver's shingle count, so
// `a.similarity(&b, ..)` and `b.similarity(&a, ..)` differ in general.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{CribError, Result};
use crate::features::read_feature_lines;

/// Which n-gram similarity coefficient to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coefficient {
    Jaccard,
    Containment,
}

impl FromStr for Coefficient {
    type Err = CribError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "jaccard" => Ok(Self::Jaccard),
            "containment" => Ok(Self::Containment),
            other => Err(CribError::UnknownCoefficient(other.to_string())),
        }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jaccard => write!(f, "jaccard"),
            Self::Containment => write!(f, "containment"),
        }
    }
}

/// The set of token shingles of a single document at one n-gram order.
///
/// Immutable once constructed. Built either from an already-tokenized
/// document or loaded from a serialized `.NGram` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NGramFeature {
    order: usize,
    shingles: HashSet<Vec<String>>,
}

impl NGramFeature {
    /// Build the feature by sliding a window of `order` tokens over the
    /// document with stride 1.
    ///
    /// A document shorter than `order` tokens yields an empty shingle set
    /// (similarity on it will fail with `EmptyFeatureSet` later).
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S], order: usize) -> Result<Self> {
        if order < 1 {
            return Err(CribError::InvalidOrder(order));
        }
        let shingles = tokens
            .windows(order)
            .map(|w| w.iter().map(|t| t.as_ref().to_string()).collect())
            .collect();
        Ok(Self { order, shingles })
    }

    /// Load a serialized `.NGram` file: a decimal order line followed by
    /// one `~`-joined shingle per line.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CribError::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let mut lines = read_feature_lines(&text);

        let order: usize = match lines.next() {
            Some(first) => first
                .trim()
                .parse()
                .map_err(|_| CribError::malformed(path, 1, format!("bad order line `{first}`")))?,
            None => return Err(CribError::malformed(path, 1, "missing order line")),
        };
        if order < 1 {
            return Err(CribError::InvalidOrder(order));
        }

        let mut shingles = HashSet::new();
        for (idx, line) in lines.enumerate() {
            let fields: Vec<String> = line.split('~').map(str::to_string).collect();
            if fields.len() != order {
                return Err(CribError::malformed(
                    path,
                    idx + 2,
                    format!("expected {order} fields, got {}", fields.len()),
                ));
            }
            shingles.insert(fields);
        }
        Ok(Self { order, shingles })
    }

    /// Write the canonical serialized form, overwriting any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut out = String::new();
        out.push_str(&self.order.to_string());
        for shingle in &self.shingles {
            out.push('\n');
            out.push_str(&shingle.join("~"));
        }
        fs::write(path, out)?;
        Ok(())
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn len(&self) -> usize {
        self.shingles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shingles.is_empty()
    }

    /// Compute the similarity against another n-gram feature.
    ///
    /// For `Containment` the denominator is this feature's shingle count.
    /// Fails with `EmptyFeatureSet` instead of dividing by zero: for
    /// `Jaccard` when both sets are empty, for `Containment` when the
    /// receiver is empty.
    pub fn similarity(&self, other: &NGramFeature, coefficient: Coefficient) -> Result<f64> {
        let intersection = self.shingles.intersection(&other.shingles).count();

        match coefficient {
            Coefficient::Jaccard => {
                let union = self.shingles.union(&other.shingles).count();
                if union == 0 {
                    return Err(CribError::EmptyFeatureSet);
                }
                Ok(intersection as f64 / union as f64)
            }
            Coefficient::Containment => {
                if self.shingles.is_empty() {
                    return Err(CribError::EmptyFeatureSet);
                }
                Ok(intersection as f64 / self.shingles.len() as f64)
            }
        }
    }
}
