use anyhow::Result;
use itertools_num::linspace;
use plotly::common::{DashType, Line, Mode};
use plotly::layout::{Axis, BarMode, Layout};
use plotly::{Histogram, Plot, Scatter};

use crate::dataset::{NEGATIVE, POSITIVE};
use crate::experiment::RunResult;
use crate::metrics::{roc_curve, ConfusionMatrix};

/// Test-set ROC curve of every run, plus the chance diagonal.
pub fn plot_roc_curves(runs: &[RunResult], title: &str) -> Result<Plot> {
    let mut plot = Plot::new();
    for run in runs {
        let curve = roc_curve(&run.test.scores.to_vec(), &run.test.labels)?;
        let trace = Scatter::new(curve.fpr, curve.tpr)
            .mode(Mode::Lines)
            .name(&format!("{} (AUC {:.3})", run.scheme, run.test.roc_auc));
        plot.add_trace(trace);
    }

    let chance = Scatter::new(vec![0.0, 1.0], vec![0.0, 1.0])
        .mode(Mode::Lines)
        .name("chance")
        .line(Line::new().color("gray").dash(DashType::Dash));
    plot.add_trace(chance);

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("False positive rate").range(vec![0.0, 1.0]))
            .y_axis(Axis::new().title("True positive rate").range(vec![0.0, 1.0])),
    );
    Ok(plot)
}

/// Overlaid histograms of predicted probabilities for each label.
pub fn plot_score_histogram(scores: &[f64], labels: &[i32], title: &str) -> Result<Plot> {
    if scores.len() != labels.len() {
        anyhow::bail!("Scores and labels must have the same length");
    }
    if labels.iter().any(|&l| l != POSITIVE && l != NEGATIVE) {
        anyhow::bail!("Labels must be composed of only two classes, 1 and -1");
    }

    let mut scores_positive = Vec::new();
    let mut scores_negative = Vec::new();
    for (&score, &label) in scores.iter().zip(labels) {
        if label == POSITIVE {
            scores_positive.push(score);
        } else {
            scores_negative.push(score);
        }
    }

    let mut plot = Plot::new();
    plot.add_trace(Histogram::new(scores_negative).name("Label -1").opacity(0.6));
    plot.add_trace(Histogram::new(scores_positive).name("Label 1").opacity(0.6));
    plot.set_layout(
        Layout::new()
            .title(title)
            .bar_mode(BarMode::Overlay)
            .x_axis(Axis::new().title("Predicted probability of label 1"))
            .y_axis(Axis::new().title("Count")),
    );
    Ok(plot)
}

/// Test-set recall of the positive label as the decision threshold moves.
pub fn plot_recall_by_threshold(runs: &[RunResult], title: &str) -> Result<Plot> {
    let thresholds: Vec<f64> = linspace(0.0, 1.0, 101).collect();

    let mut plot = Plot::new();
    for run in runs {
        let scores = run.test.scores.to_vec();
        let recall = thresholds
            .iter()
            .map(|&t| Ok(ConfusionMatrix::from_scores(&scores, &run.test.labels, t)?.recall()))
            .collect::<Result<Vec<f64>>>()?;
        plot.add_trace(
            Scatter::new(thresholds.clone(), recall)
                .mode(Mode::Lines)
                .name(run.scheme.as_str()),
        );
    }

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("Threshold"))
            .y_axis(Axis::new().title("Recall (label 1)").range(vec![0.0, 1.05])),
    );
    Ok(plot)
}
