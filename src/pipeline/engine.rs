// The concurrent pairwise scoring run.
//
// Lifecycle: build the (suspicious × source) pair list, fan the pairs out
// over a bounded pool of blocking workers, funnel completed scores through
// a bounded channel into the single writer, then close. Row order is
// completion order — every row carries both document ids, so nothing
// downstream may rely on ordering.
//
// Backpressure chain: a full channel blocks the driver, which stops
// pulling worker completions, which stops dispatching new pairs.
//
// Cancellation stops dispatch only: in-flight pairs finish, their rows are
// drained, and the writer closes cleanly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::annotations::AnnotationSource;
use crate::catalog::FeatureCatalog;
use crate::config;
use crate::features::Coefficient;
use crate::pipeline::pairs::{self, compute_pair, DocEntry, PairFailure};
use crate::pipeline::writer::{self, ScoreWriter};

/// What to do when a single pair fails (missing or malformed feature file,
/// empty feature set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairErrorPolicy {
    /// Abort the whole run, identifying the failing pair (default).
    Fail,
    /// Log a warning with both document ids and the feature kind, drop the
    /// row, and keep going.
    Skip,
}

/// Tunables for one scoring run.
#[derive(Debug, Clone)]
pub struct ScoreOptions {
    /// Concurrent pair workers. Defaults to available parallelism plus a
    /// little headroom, since workers spend much of their time in file I/O.
    pub workers: usize,
    /// Bound of the score channel feeding the writer.
    pub queue_capacity: usize,
    /// Coefficient applied to n-gram kinds (dependency kinds have a fixed
    /// formula).
    pub coefficient: Coefficient,
    pub error_policy: PairErrorPolicy,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            workers: config::default_workers(),
            queue_capacity: config::DEFAULT_QUEUE_CAPACITY,
            coefficient: Coefficient::Jaccard,
            error_policy: PairErrorPolicy::Fail,
        }
    }
}

/// What a finished (or cancelled) run did.
#[derive(Debug)]
pub struct RunSummary {
    pub pairs_total: usize,
    pub rows_written: usize,
    pub pairs_skipped: usize,
    pub cancelled: bool,
}

/// Score every (source, suspicious) document pair against every cataloged
/// feature kind and write the CSV table to `output`.
///
/// Passing `annotations` enables training mode: each row gains a 0/1
/// `plagiarized` label looked up from the suspicious document's annotation
/// file. Configuration problems surface before the output file is created.
pub async fn write_scores(
    catalog: &FeatureCatalog,
    source_files: &[PathBuf],
    suspicious_files: &[PathBuf],
    output: &Path,
    annotations: Option<Arc<dyn AnnotationSource>>,
    options: &ScoreOptions,
    cancel: CancellationToken,
) -> Result<RunSummary> {
    let sources = doc_entries(source_files)?;
    let suspicious = doc_entries(suspicious_files)?;
    let pairs = pairs::build_pairs(&suspicious, &sources);
    let total = pairs.len();

    let mut header: Vec<String> = vec!["src".to_string(), "sus".to_string()];
    header.extend(catalog.names().iter().map(|n| n.to_string()));
    if annotations.is_some() {
        header.push("plagiarized".to_string());
    }

    info!(
        pairs = total,
        kinds = catalog.len(),
        workers = options.workers,
        training = annotations.is_some(),
        "starting scoring run"
    );

    let score_writer = ScoreWriter::create(output, &header)
        .with_context(|| format!("creating score table {}", output.display()))?;
    let (tx, rx) = mpsc::channel(options.queue_capacity.max(1));
    let writer_task = task::spawn_blocking(move || writer::drain(rx, score_writer));

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Scoring [{bar:30}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    let catalog = Arc::new(catalog.clone());
    let coefficient = options.coefficient;

    let mut results = stream::iter(pairs)
        .take_while(|_| future::ready(!cancel.is_cancelled()))
        .map(|pair| {
            let catalog = Arc::clone(&catalog);
            let annotations = annotations.clone();
            task::spawn_blocking(move || {
                compute_pair(&pair, &catalog, coefficient, annotations.as_deref())
            })
        })
        .buffer_unordered(options.workers.max(1));

    let mut skipped = 0usize;
    let mut failed: Option<PairFailure> = None;
    while let Some(joined) = results.next().await {
        match joined.context("pair worker panicked")? {
            Ok(score) => {
                if tx.send(score).await.is_err() {
                    // Writer is gone; its error surfaces when we join it.
                    break;
                }
            }
            Err(failure) => match options.error_policy {
                PairErrorPolicy::Fail => {
                    failed = Some(failure);
                    break;
                }
                PairErrorPolicy::Skip => {
                    warn!(
                        source = %failure.source_id,
                        suspicious = %failure.suspicious_id,
                        kind = %failure.kind,
                        error = %failure.error,
                        "pair failed, skipping"
                    );
                    skipped += 1;
                }
            },
        }
        pb.inc(1);
    }
    drop(results);

    // Closing the channel is the writer's stop sentinel; it drains whatever
    // is queued, flushes, and reports the row count.
    drop(tx);
    let rows_written = writer_task
        .await
        .context("score writer task panicked")?
        .context("writing score table")?;
    pb.finish_and_clear();

    if let Some(failure) = failed {
        return Err(anyhow::Error::new(failure).context("scoring run aborted"));
    }

    let cancelled = cancel.is_cancelled();
    if cancelled {
        info!(rows_written, "scoring run cancelled before completion");
    } else {
        info!(rows_written, skipped, "scoring run complete");
    }

    Ok(RunSummary {
        pairs_total: total,
        rows_written,
        pairs_skipped: skipped,
        cancelled,
    })
}

fn doc_entries(files: &[PathBuf]) -> Result<Vec<Arc<DocEntry>>> {
    files
        .iter()
        .map(|path| {
            DocEntry::from_path(path)
                .map(Arc::new)
                .with_context(|| format!("document path has no file name: {}", path.display()))
        })
        .collect()
}
