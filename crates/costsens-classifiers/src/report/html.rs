//! Standalone HTML page summarising an experiment.
use std::path::Path;

use anyhow::{Context, Result};
use maud::{html, PreEscaped, DOCTYPE};

use crate::experiment::ExperimentResult;
use crate::report::plots::{plot_recall_by_threshold, plot_roc_curves, plot_score_histogram};

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

const STYLE: &str = "
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ccc; padding: 0.3em 0.8em; text-align: right; }
th:first-child, td:first-child { text-align: left; }
";

/// Render the report page as a string.
pub fn render_report(result: &ExperimentResult, title: &str) -> Result<String> {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let roc_html = plot_roc_curves(&result.runs, "ROC curves (test set)")?
        .to_inline_html(Some("roc_curves"));
    let recall_html = plot_recall_by_threshold(&result.runs, "Recall by threshold (test set)")?
        .to_inline_html(Some("recall_by_threshold"));

    let mut histograms = Vec::with_capacity(result.runs.len());
    for (i, run) in result.runs.iter().enumerate() {
        let plot = plot_score_histogram(
            &run.test.scores.to_vec(),
            &run.test.labels,
            &format!("{}: test-set probabilities", run.scheme),
        )?;
        histograms.push(plot.to_inline_html(Some(format!("histogram_{}", i).as_str())));
    }

    let markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
                script src=(PLOTLY_JS) {}
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { (title) }
                p { "Generated " (generated) }
                p {
                    (result.n_train) " training rows, "
                    (result.n_test) " test rows, "
                    (result.n_features) " features"
                }
                table {
                    thead {
                        tr {
                            th { "Scheme" }
                            th { "Weighting" }
                            th { "Train ROC-AUC" }
                            th { "Test ROC-AUC" }
                            th { "Test recall" }
                            th { "Test precision" }
                        }
                    }
                    tbody {
                        @for run in &result.runs {
                            tr {
                                td { (run.scheme) }
                                td { (run.description) }
                                td { (format!("{:.4}", run.train.roc_auc)) }
                                td { (format!("{:.4}", run.test.roc_auc)) }
                                td { (format!("{:.4}", run.test.confusion.recall())) }
                                td { (format!("{:.4}", run.test.confusion.precision())) }
                            }
                        }
                    }
                }
                h2 { "ROC curves" }
                (PreEscaped(roc_html))
                h2 { "Recall by threshold" }
                (PreEscaped(recall_html))
                h2 { "Score distributions" }
                @for hist in &histograms {
                    (PreEscaped(hist.as_str()))
                }
            }
        }
    };

    Ok(markup.into_string())
}

/// Render the report and write it to `path`.
pub fn write_html_report<P: AsRef<Path>>(result: &ExperimentResult, path: P) -> Result<()> {
    let page = render_report(result, "Cost-sensitive logistic regression")?;
    std::fs::write(&path, page)
        .with_context(|| format!("Failed to write report: {}", path.as_ref().display()))?;
    log::info!("Report written to {}", path.as_ref().display());
    Ok(())
}
