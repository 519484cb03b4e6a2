//! Tab separated summary of experiment runs.
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::experiment::RunResult;

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    scheme: &'a str,
    weighting: &'a str,
    train_roc_auc: f64,
    test_roc_auc: f64,
    test_recall: f64,
    test_precision: f64,
    test_true_positive: usize,
    test_false_negative: usize,
}

impl<'a> From<&'a RunResult> for ResultRow<'a> {
    fn from(run: &'a RunResult) -> Self {
        ResultRow {
            scheme: &run.scheme,
            weighting: &run.description,
            train_roc_auc: run.train.roc_auc,
            test_roc_auc: run.test.roc_auc,
            test_recall: run.test.confusion.recall(),
            test_precision: run.test.confusion.precision(),
            test_true_positive: run.test.confusion.true_positive,
            test_false_negative: run.test.confusion.false_negative,
        }
    }
}

/// Write one header row and one row per run to any writer.
pub fn write_results<W: Write>(runs: &[RunResult], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    for run in runs {
        wtr.serialize(ResultRow::from(run))
            .with_context(|| format!("Failed to write result row for '{}'", run.scheme))?;
    }
    wtr.flush().context("Failed to flush results")?;
    Ok(())
}

/// Write the run summary as TSV to `path`.
pub fn write_results_tsv<P: AsRef<Path>>(runs: &[RunResult], path: P) -> Result<()> {
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.as_ref().display()))?;
    write_results(runs, file)?;
    log::info!("Wrote {} result rows to {}", runs.len(), path.as_ref().display());
    Ok(())
}
