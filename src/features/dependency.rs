// Syntactic dependency-relation features.
//
// One relation triple per parsed word: (dependent, governor, label), with
// the sentinel governor "root" for words that have no syntactic head.
// Similarity treats the sequence as a multiset — duplicate triples count,
// parse order does not:
//
//   sim(A, B) = sum over distinct triples of min(count_A, count_B) / |A|
//
// where |A| is the receiver's total relation count with multiplicity. The
// denominator is the self side only, so this is containment-shaped and
// deliberately not symmetric.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{CribError, Result};
use crate::features::read_feature_lines;

/// One syntactic link from a parsed sentence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DepRelation {
    pub dependent: String,
    pub governor: String,
    pub label: String,
}

impl DepRelation {
    pub fn new(
        dependent: impl Into<String>,
        governor: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            dependent: dependent.into(),
            governor: governor.into(),
            label: label.into(),
        }
    }
}

/// The dependency-relation sequence of a single parsed document.
///
/// Relations come from an external dependency parser; this type only
/// stores, serializes, and compares them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyFeature {
    relations: Vec<DepRelation>,
}

impl DependencyFeature {
    /// Wrap an already-parsed relation sequence.
    pub fn new(relations: Vec<DepRelation>) -> Self {
        Self { relations }
    }

    /// Load a serialized `.dep` file: one `~`-joined triple per line, no
    /// header.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CribError::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;

        let mut relations = Vec::new();
        for (idx, line) in read_feature_lines(&text).enumerate() {
            let mut fields = line.split('~');
            match (fields.next(), fields.next(), fields.next(), fields.next()) {
                (Some(dep), Some(gov), Some(label), None) => {
                    relations.push(DepRelation::new(dep, gov, label));
                }
                _ => {
                    return Err(CribError::malformed(
                        path,
                        idx + 1,
                        format!("expected 3 `~`-joined fields in `{line}`"),
                    ));
                }
            }
        }
        Ok(Self { relations })
    }

    /// Write the canonical serialized form, overwriting any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let lines: Vec<String> = self
            .relations
            .iter()
            .map(|r| format!("{}~{}~{}", r.dependent, r.governor, r.label))
            .collect();
        fs::write(path, lines.join("\n"))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Multiset containment of this feature's relations in `other`.
    ///
    /// Fails with `EmptyFeatureSet` when the receiver has no relations
    /// (the denominator would be zero).
    pub fn similarity(&self, other: &DependencyFeature) -> Result<f64> {
        if self.relations.is_empty() {
            return Err(CribError::EmptyFeatureSet);
        }

        let mut theirs: HashMap<&DepRelation, usize> = HashMap::new();
        for rel in &other.relations {
            *theirs.entry(rel).or_insert(0) += 1;
        }
        let mut ours: HashMap<&DepRelation, usize> = HashMap::new();
        for rel in &self.relations {
            *ours.entry(rel).or_insert(0) += 1;
        }

        let shared: usize = ours
            .iter()
            .map(|(rel, count)| (*count).min(theirs.get(rel).copied().unwrap_or(0)))
            .sum();

        Ok(shared as f64 / self.relations.len() as f64)
    }
}
