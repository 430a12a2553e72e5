// The single writer that owns the output score table.
//
// Exactly one task ever touches the output file. Completed scores arrive
// over a bounded channel; each row is written and flushed before the next
// is accepted, so a crash can truncate the table but never interleave or
// corrupt a row. The channel closing is the stop sentinel.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::Result;
use crate::pipeline::pairs::PairScore;

/// Sequential CSV writer for the score table.
pub struct ScoreWriter {
    out: BufWriter<File>,
    rows: usize,
}

impl ScoreWriter {
    /// Create (or truncate) the output file and write the header row.
    pub fn create(path: &Path, header: &[String]) -> Result<Self> {
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(header.join(",").as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(Self { out, rows: 0 })
    }

    /// Append one row in catalog column order and flush it to disk.
    pub fn append(&mut self, score: &PairScore) -> Result<()> {
        let mut row = format!("{},{}", score.source_id, score.suspicious_id);
        for (_, value) in &score.scores {
            row.push(',');
            row.push_str(&value.to_string());
        }
        if let Some(plagiarized) = score.plagiarized {
            row.push(',');
            row.push(if plagiarized { '1' } else { '0' });
        }
        row.push('\n');
        self.out.write_all(row.as_bytes())?;
        self.out.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Final flush; returns the number of data rows written.
    pub fn finish(mut self) -> Result<usize> {
        self.out.flush()?;
        Ok(self.rows)
    }
}

/// Writer loop: consume scores until every sender is gone, then close.
///
/// Runs on a dedicated blocking thread. Any write or flush failure aborts
/// the loop immediately — rows are never silently dropped.
pub fn drain(mut rx: mpsc::Receiver<PairScore>, mut writer: ScoreWriter) -> Result<usize> {
    while let Some(score) = rx.blocking_recv() {
        writer.append(&score)?;
    }
    let rows = writer.finish()?;
    debug!(rows, "score writer closed");
    Ok(rows)
}
