// Pair list construction and per-pair score computation.
//
// One PairTask per (suspicious, source) document combination. Each task is
// independent: a worker loads the two serialized feature files for every
// cataloged kind, applies the kind's similarity formula, and (in training
// mode) looks up the ground-truth label. The receiver of every similarity
// call is the suspicious side, so containment-style denominators are the
// suspicious document's feature count.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::annotations::AnnotationSource;
use crate::catalog::FeatureCatalog;
use crate::error::{CribError, Result};
use crate::features::{Coefficient, Feature};

/// One corpus document: its identifier (file name), its stem used to
/// resolve feature files, and its path (used for the `.xml` sibling in
/// training mode).
#[derive(Debug)]
pub struct DocEntry {
    pub id: String,
    pub stem: String,
    pub path: PathBuf,
}

impl DocEntry {
    pub fn from_path(path: &Path) -> Option<Self> {
        let id = path.file_name()?.to_string_lossy().into_owned();
        let stem = path.file_stem()?.to_string_lossy().into_owned();
        Some(Self {
            id,
            stem,
            path: path.to_path_buf(),
        })
    }
}

/// One unit of work for the scoring pool.
#[derive(Debug, Clone)]
pub struct PairTask {
    pub source: Arc<DocEntry>,
    pub suspicious: Arc<DocEntry>,
}

/// Cross product of the two corpora, suspicious documents outermost.
pub fn build_pairs(suspicious: &[Arc<DocEntry>], sources: &[Arc<DocEntry>]) -> Vec<PairTask> {
    let mut pairs = Vec::with_capacity(suspicious.len() * sources.len());
    for sus in suspicious {
        for src in sources {
            pairs.push(PairTask {
                source: Arc::clone(src),
                suspicious: Arc::clone(sus),
            });
        }
    }
    pairs
}

/// List the `*.txt` corpus documents under `dir`, sorted by name.
pub fn list_corpus(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CribError::FileNotFound(dir.to_path_buf()));
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    Ok(files)
}

/// The completed result row for one document pair.
///
/// `scores` is ordered by the catalog's column order; `plagiarized` is
/// present only in training mode.
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    pub source_id: String,
    pub suspicious_id: String,
    pub scores: Vec<(String, f64)>,
    pub plagiarized: Option<bool>,
}

/// A failure attached to one specific pair, with enough identifying detail
/// to diagnose it (both document ids and the feature kind involved).
#[derive(Debug, Error)]
#[error("pair src=`{source_id}` sus=`{suspicious_id}` [{kind}]: {error}")]
pub struct PairFailure {
    pub source_id: String,
    pub suspicious_id: String,
    /// Feature kind name, or `"label"` for ground-truth lookup failures.
    pub kind: String,
    #[source]
    pub error: CribError,
}

/// Compute every cataloged similarity for one pair.
///
/// Runs on a blocking worker thread: it reads `2 × kinds` feature files
/// plus, when `annotations` is provided, the suspicious document's XML
/// sibling for the 0/1 label.
pub fn compute_pair(
    task: &PairTask,
    catalog: &FeatureCatalog,
    coefficient: Coefficient,
    annotations: Option<&dyn AnnotationSource>,
) -> Result<PairScore, PairFailure> {
    let fail = |kind: &str, error: CribError| PairFailure {
        source_id: task.source.id.clone(),
        suspicious_id: task.suspicious.id.clone(),
        kind: kind.to_string(),
        error,
    };

    let mut scores = Vec::with_capacity(catalog.len());
    for entry in catalog.entries() {
        let source = Feature::load(entry.class, &entry.source_path(&task.source.stem))
            .map_err(|e| fail(&entry.name, e))?;
        let suspicious = Feature::load(entry.class, &entry.suspicious_path(&task.suspicious.stem))
            .map_err(|e| fail(&entry.name, e))?;
        let score = suspicious
            .similarity(&source, coefficient)
            .map_err(|e| fail(&entry.name, e))?;
        scores.push((entry.name.clone(), score));
    }

    let plagiarized = match annotations {
        Some(annotations) => {
            let xml = task.suspicious.path.with_extension("xml");
            let refs = annotations
                .plagiarized_refs(&xml)
                .map_err(|e| fail("label", e))?;
            Some(refs.iter().any(|r| r.source_file == task.source.id))
        }
        None => None,
    };

    Ok(PairScore {
        source_id: task.source.id.clone(),
        suspicious_id: task.suspicious.id.clone(),
        scores,
        plagiarized,
    })
}
