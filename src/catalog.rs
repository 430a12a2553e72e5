// Feature catalog discovery.
//
// A features root produced by the preprocessing step holds one directory
// pair per feature kind:
//
//   source-<kind>-ngram / suspicious-<kind>-ngram   (e.g. kind "3")
//   source-dep          / suspicious-dep            (fixed dependency pair)
//
// each containing one serialized feature file per document. Discovery
// pairs the directories by kind and fixes the column order of the output
// table: n-gram kinds sorted by name, then the dependency kind.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CribError, Result};
use crate::features::FeatureClass;

/// One discovered feature kind with its paired directories.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Kind name as it appears in the CSV header (e.g. `"3"`, `"dep"`).
    pub name: String,
    pub class: FeatureClass,
    pub source_dir: PathBuf,
    pub suspicious_dir: PathBuf,
}

impl CatalogEntry {
    /// Expected path of a source document's feature file, by document stem.
    pub fn source_path(&self, stem: &str) -> PathBuf {
        self.source_dir.join(format!("{stem}.{}", self.class.extension()))
    }

    /// Expected path of a suspicious document's feature file, by stem.
    pub fn suspicious_path(&self, stem: &str) -> PathBuf {
        self.suspicious_dir
            .join(format!("{stem}.{}", self.class.extension()))
    }
}

/// The ordered mapping from feature kind to its directory pair.
///
/// Iteration order is the canonical column order of the score table.
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    entries: Vec<CatalogEntry>,
}

impl FeatureCatalog {
    /// Scan `root` for recognized feature directories and pair them by kind.
    ///
    /// Fails with `CatalogMismatch` when `root` is not a directory, when a
    /// source directory has no suspicious counterpart (or vice versa), or
    /// when a paired directory's feature-file counts differ.
    pub fn discover(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(CribError::CatalogMismatch(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let mut source_ngrams: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut suspicious_ngrams: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut source_dep: Option<PathBuf> = None;
        let mut suspicious_dep: Option<PathBuf> = None;

        for dir_entry in fs::read_dir(root)? {
            let dir_entry = dir_entry?;
            if !dir_entry.path().is_dir() {
                continue;
            }
            let name = dir_entry.file_name().to_string_lossy().into_owned();

            if name == "source-dep" {
                source_dep = Some(dir_entry.path());
            } else if name == "suspicious-dep" {
                suspicious_dep = Some(dir_entry.path());
            } else if let Some(kind) = ngram_kind(&name, "source-") {
                source_ngrams.insert(kind.to_string(), dir_entry.path());
            } else if let Some(kind) = ngram_kind(&name, "suspicious-") {
                suspicious_ngrams.insert(kind.to_string(), dir_entry.path());
            }
        }

        let mut entries = Vec::new();
        for (kind, source_dir) in &source_ngrams {
            let suspicious_dir = suspicious_ngrams.remove(kind).ok_or_else(|| {
                CribError::CatalogMismatch(format!(
                    "source-{kind}-ngram has no suspicious-{kind}-ngram counterpart"
                ))
            })?;
            entries.push(CatalogEntry {
                name: kind.clone(),
                class: FeatureClass::NGram,
                source_dir: source_dir.clone(),
                suspicious_dir,
            });
        }
        if let Some((kind, _)) = suspicious_ngrams.into_iter().next() {
            return Err(CribError::CatalogMismatch(format!(
                "suspicious-{kind}-ngram has no source-{kind}-ngram counterpart"
            )));
        }

        match (source_dep, suspicious_dep) {
            (Some(source_dir), Some(suspicious_dir)) => entries.push(CatalogEntry {
                name: "dep".to_string(),
                class: FeatureClass::Dependency,
                source_dir,
                suspicious_dir,
            }),
            (Some(_), None) => {
                return Err(CribError::CatalogMismatch(
                    "source-dep has no suspicious-dep counterpart".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(CribError::CatalogMismatch(
                    "suspicious-dep has no source-dep counterpart".to_string(),
                ));
            }
            (None, None) => {}
        }

        for entry in &entries {
            let sources = count_feature_files(&entry.source_dir, entry.class)?;
            let suspicious = count_feature_files(&entry.suspicious_dir, entry.class)?;
            if sources != suspicious {
                return Err(CribError::CatalogMismatch(format!(
                    "kind `{}`: {} source feature files vs {} suspicious",
                    entry.name, sources, suspicious
                )));
            }
            debug!(kind = %entry.name, files = sources, "catalog entry discovered");
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Kind names in column order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract `<kind>` from a `<side><kind>-ngram` directory name.
fn ngram_kind<'a>(name: &'a str, side_prefix: &str) -> Option<&'a str> {
    name.strip_prefix(side_prefix)?
        .strip_suffix("-ngram")
        .filter(|kind| !kind.is_empty())
}

fn count_feature_files(dir: &Path, class: FeatureClass) -> Result<usize> {
    let mut count = 0;
    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if path.extension().is_some_and(|ext| ext == class.extension()) {
            count += 1;
        }
    }
    Ok(count)
}
