use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::warn;

use crib::annotations::XmlAnnotations;
use crib::catalog::FeatureCatalog;
use crib::config::Config;
use crib::features::Coefficient;
use crib::pipeline::{self, PairErrorPolicy, ScoreOptions};

/// Crib: pairwise feature-similarity scoring for plagiarism detection.
///
/// Compares a corpus of suspicious documents against a corpus of source
/// documents using precomputed n-gram and dependency-relation features,
/// and writes one similarity row per document pair.
#[derive(Parser)]
#[command(name = "crib", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the preprocessed features directory
    Catalog {
        /// Root directory holding the feature subdirectories
        features: PathBuf,
    },

    /// Score every (source, suspicious) document pair into a CSV table
    Scores {
        /// Directory of source corpus documents (*.txt)
        src_files: PathBuf,

        /// Directory of suspicious corpus documents (*.txt)
        sus_files: PathBuf,

        /// Root directory holding the preprocessed feature subdirectories
        features: PathBuf,

        /// Output CSV path
        output: PathBuf,

        /// Add a 0/1 plagiarized label column from the suspicious
        /// documents' XML annotations
        #[arg(long)]
        train: bool,

        /// Similarity coefficient for n-gram kinds: jaccard or containment
        #[arg(long, default_value = "jaccard")]
        coefficient: String,

        /// Log and skip failing pairs instead of aborting the run
        #[arg(long)]
        skip_errors: bool,

        /// Number of concurrent pair workers (default: parallelism + 2)
        #[arg(long)]
        workers: Option<usize>,

        /// Bound of the result queue feeding the writer (default: 1024)
        #[arg(long)]
        queue_capacity: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("crib=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog { features } => {
            let catalog = FeatureCatalog::discover(&features)?;
            if catalog.is_empty() {
                println!("No feature kinds found under {}", features.display());
                return Ok(());
            }
            println!("Feature kinds under {}:", features.display());
            for entry in catalog.entries() {
                println!(
                    "  {:8} {:12} {}  |  {}",
                    entry.name.bold(),
                    entry.class.to_string(),
                    entry.source_dir.display(),
                    entry.suspicious_dir.display(),
                );
            }
        }

        Commands::Scores {
            src_files,
            sus_files,
            features,
            output,
            train,
            coefficient,
            skip_errors,
            workers,
            queue_capacity,
        } => {
            let config = Config::load()?;

            // All configuration is validated before any pair work starts.
            let coefficient: Coefficient = coefficient.parse()?;
            let catalog = FeatureCatalog::discover(&features)?;
            if catalog.is_empty() {
                bail!("no feature kinds found under {}", features.display());
            }

            let sources = pipeline::list_corpus(&src_files)?;
            let suspicious = pipeline::list_corpus(&sus_files)?;
            if sources.is_empty() || suspicious.is_empty() {
                bail!(
                    "nothing to score: {} source and {} suspicious documents",
                    sources.len(),
                    suspicious.len()
                );
            }

            let options = ScoreOptions {
                workers: workers.unwrap_or(config.workers),
                queue_capacity: queue_capacity.unwrap_or(config.queue_capacity),
                coefficient,
                error_policy: if skip_errors {
                    PairErrorPolicy::Skip
                } else {
                    PairErrorPolicy::Fail
                },
            };
            let annotations = train.then(|| {
                Arc::new(XmlAnnotations::new()) as Arc<dyn crib::annotations::AnnotationSource>
            });

            // Ctrl-C stops dispatching new pairs and lets the run close cleanly.
            let cancel = tokio_util::sync::CancellationToken::new();
            let cancel_on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, finishing in-flight pairs");
                    cancel_on_interrupt.cancel();
                }
            });

            println!(
                "Scoring {} x {} document pairs across {} feature kinds...",
                suspicious.len(),
                sources.len(),
                catalog.len(),
            );

            let summary = pipeline::write_scores(
                &catalog,
                &sources,
                &suspicious,
                &output,
                annotations,
                &options,
                cancel,
            )
            .await?;

            if summary.cancelled {
                println!(
                    "{} wrote {} of {} rows to {}",
                    "Cancelled:".yellow().bold(),
                    summary.rows_written,
                    summary.pairs_total,
                    output.display(),
                );
            } else {
                println!(
                    "{} {} rows written to {}",
                    "Done:".green().bold(),
                    summary.rows_written,
                    output.display(),
                );
            }
            if summary.pairs_skipped > 0 {
                println!(
                    "{} {} pairs skipped (see warnings above)",
                    "Note:".yellow(),
                    summary.pairs_skipped,
                );
            }
        }
    }

    Ok(())
}
