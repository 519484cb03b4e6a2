//! Load -> split -> weighted fit -> score.
//!
//! [`fit_and_score`] trains one model with a given class/sample weighting and
//! evaluates it on both subsets. [`run_experiment`] repeats that for every
//! configured [`WeightScheme`] on a single shared split, so the ROC-AUC
//! values are directly comparable.
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::dataset::Dataset;
use crate::io::{read_csv_with_config, CsvReaderConfig};
use crate::metrics::{roc_auc, ConfusionMatrix};
use crate::models::factory::build_model;
use crate::preprocessing::fit_scaler;
use crate::split::{train_test_split, TrainTestSplit};
use crate::weighting::{effective_weights, ClassWeights, WeightScheme};

/// A weighting scheme with a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedScheme {
    pub name: String,
    pub scheme: WeightScheme,
}

impl NamedScheme {
    pub fn new(name: &str, scheme: WeightScheme) -> Self {
        Self {
            name: name.to_string(),
            scheme,
        }
    }
}

/// Where the data comes from and how much of it to use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    #[serde(flatten)]
    pub reader: CsvReaderConfig,
    /// Randomly keep this many rows before splitting.
    pub sample_rows: Option<usize>,
}

/// Parameters for one weighting comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub data: DataConfig,
    pub test_fraction: f64,
    pub seed: u64,
    pub stratify: bool,
    pub scale_features: bool,
    /// Probability at or above which a row is predicted positive.
    pub threshold: f64,
    pub model: ModelConfig,
    pub schemes: Vec<NamedScheme>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            test_fraction: 0.3,
            seed: 0,
            stratify: false,
            scale_features: false,
            threshold: 0.5,
            model: ModelConfig::default(),
            schemes: default_schemes(),
        }
    }
}

/// Unweighted baseline, a 1:10 class penalty, balanced class weights and
/// a 1:99 per-row penalty.
pub fn default_schemes() -> Vec<NamedScheme> {
    let class_weight: BTreeMap<i32, f64> = [(-1, 1.0), (1, 10.0)].into_iter().collect();
    vec![
        NamedScheme::new("unweighted", WeightScheme::Unweighted),
        NamedScheme::new(
            "class_weight",
            WeightScheme::ClassWeight {
                weights: class_weight,
            },
        ),
        NamedScheme::new("balanced", WeightScheme::Balanced),
        NamedScheme::new(
            "sample_weight",
            WeightScheme::SampleWeight {
                negative: 1.0,
                positive: 99.0,
            },
        ),
    ]
}

/// Load an experiment configuration from a JSON file.
pub fn load_experiment_config<P: AsRef<Path>>(path: P) -> Result<ExperimentConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: ExperimentConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Scores and metrics of one fitted model on one subset.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub roc_auc: f64,
    pub confusion: ConfusionMatrix,
    pub scores: Array1<f64>,
    pub labels: Vec<i32>,
}

impl Evaluation {
    pub fn new(scores: Array1<f64>, labels: Vec<i32>, threshold: f64) -> Result<Self> {
        let score_slice = scores.to_vec();
        let roc_auc = roc_auc(&score_slice, &labels, None)?;
        let confusion = ConfusionMatrix::from_scores(&score_slice, &labels, threshold)?;
        Ok(Evaluation {
            roc_auc,
            confusion,
            scores,
            labels,
        })
    }
}

/// Outcome of fitting one weighting configuration.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub scheme: String,
    pub description: String,
    pub model_name: String,
    pub train: Evaluation,
    pub test: Evaluation,
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ({}) ==", self.scheme, self.description)?;
        writeln!(f, "Train set")?;
        writeln!(f, "{} roc-auc: {}", self.model_name, self.train.roc_auc)?;
        writeln!(f, "Test set")?;
        writeln!(f, "{} roc-auc: {}", self.model_name, self.test.roc_auc)?;
        write!(
            f,
            "Test recall: {:.4}, precision: {:.4}",
            self.test.confusion.recall(),
            self.test.confusion.precision()
        )
    }
}

/// Every run of an experiment plus the split it was computed on.
#[derive(Debug, Clone)]
pub struct ExperimentResult {
    pub runs: Vec<RunResult>,
    pub n_train: usize,
    pub n_test: usize,
    pub n_features: usize,
}

impl ExperimentResult {
    pub fn best_by_test_auc(&self) -> Option<&RunResult> {
        self.runs.iter().max_by(|a, b| {
            a.test
                .roc_auc
                .partial_cmp(&b.test.roc_auc)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

/// Fit one model on `split.train` with the given weights and score both
/// subsets.
///
/// `class_weight` and `sample_weight` may be combined; the model is trained
/// on their per-row product. `sample_weight` must have one entry per
/// training row.
pub fn fit_and_score(
    split: &TrainTestSplit,
    class_weight: Option<&ClassWeights>,
    sample_weight: Option<&[f64]>,
    model_config: &ModelConfig,
    threshold: f64,
) -> Result<RunResult> {
    let train_labels = split.train.labels();
    let weights = effective_weights(&train_labels, class_weight, sample_weight)
        .context("Invalid training weights")?;

    let mut model = build_model(model_config);
    let weight_arg = if class_weight.is_none() && sample_weight.is_none() {
        None
    } else {
        Some(weights.as_slice())
    };
    model
        .fit(&split.train.x, &train_labels, weight_arg)
        .context("Model fitting failed")?;

    let train_scores = model.predict_proba(&split.train.x)?;
    let test_scores = model.predict_proba(&split.test.x)?;

    let train = Evaluation::new(train_scores, train_labels, threshold)
        .context("Failed to score training set")?;
    let test = Evaluation::new(test_scores, split.test.labels(), threshold)
        .context("Failed to score test set")?;

    Ok(RunResult {
        scheme: "custom".to_string(),
        description: describe_weights(class_weight, sample_weight),
        model_name: model.name().to_string(),
        train,
        test,
    })
}

fn describe_weights(class_weight: Option<&ClassWeights>, sample_weight: Option<&[f64]>) -> String {
    let mut parts = Vec::new();
    if let Some(cw) = class_weight {
        parts.push(format!("class_weight {{-1: {}, 1: {}}}", cw.negative, cw.positive));
    }
    if sample_weight.is_some() {
        parts.push("sample_weight".to_string());
    }
    if parts.is_empty() {
        "no weighting".to_string()
    } else {
        parts.join(" x ")
    }
}

/// Run every scheme of `config` on one prepared split.
pub fn compare_schemes(split: &TrainTestSplit, config: &ExperimentConfig) -> Result<Vec<RunResult>> {
    if config.schemes.is_empty() {
        anyhow::bail!("No weighting schemes configured");
    }

    let train_labels = split.train.labels();
    config
        .schemes
        .iter()
        .map(|named| {
            log::info!("Fitting scheme '{}': {}", named.name, named.scheme.describe());
            let weights = named
                .scheme
                .resolve(&train_labels)
                .with_context(|| format!("Invalid weights for scheme '{}'", named.name))?;
            let mut run = fit_and_score(
                split,
                weights.class_weight.as_ref(),
                weights.sample_weight.as_deref(),
                &config.model,
                config.threshold,
            )
            .with_context(|| format!("Scheme '{}' failed", named.name))?;
            run.scheme = named.name.clone();
            run.description = named.scheme.describe();
            log::info!(
                "Scheme '{}': train roc-auc {:.4}, test roc-auc {:.4}",
                run.scheme,
                run.train.roc_auc,
                run.test.roc_auc
            );
            Ok(run)
        })
        .collect()
}

/// Split an in-memory dataset, optionally scale, and compare all schemes.
pub fn run_on_dataset(dataset: &Dataset, config: &ExperimentConfig) -> Result<ExperimentResult> {
    let dataset = match config.data.sample_rows {
        Some(n) => dataset.sample(n, config.seed),
        None => dataset.clone(),
    };
    dataset.log_summary();

    let mut split = train_test_split(&dataset, config.test_fraction, config.seed, config.stratify)?;

    if config.scale_features {
        let scaler = fit_scaler(&split.train.x).context("Failed to fit feature scaler")?;
        split.train.x = scaler.transform(&split.train.x);
        split.test.x = scaler.transform(&split.test.x);
        log::debug!("Standardised {} feature columns", dataset.n_features());
    }

    let runs = compare_schemes(&split, config)?;

    Ok(ExperimentResult {
        runs,
        n_train: split.train.n_samples(),
        n_test: split.test.n_samples(),
        n_features: dataset.n_features(),
    })
}

/// Read `data_path` and run the experiment described by `config`.
pub fn run_experiment<P: AsRef<Path>>(data_path: P, config: &ExperimentConfig) -> Result<ExperimentResult> {
    let dataset = read_csv_with_config(&data_path, &config.data.reader)?;
    run_on_dataset(&dataset, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn toy_dataset() -> Dataset {
        let n = 200;
        let x = Array2::from_shape_fn((n, 2), |(i, j)| {
            let base = (i * 37 % 101) as f64 / 101.0;
            if j == 0 {
                base + if i % 10 == 0 { 0.6 } else { 0.0 }
            } else {
                (i * 53 % 97) as f64 / 97.0
            }
        });
        let y = Array1::from_shape_fn(n, |i| if i % 10 == 0 { 1 } else { -1 });
        Dataset::new(x, y, vec!["a".into(), "b".into()]).unwrap()
    }

    #[test]
    fn default_config_has_four_schemes() {
        let cfg = ExperimentConfig::default();
        assert_eq!(cfg.schemes.len(), 4);
        assert_eq!(cfg.test_fraction, 0.3);
        assert_eq!(cfg.data.reader.label_column, "target");
    }

    #[test]
    fn sample_weight_length_is_checked() {
        let ds = toy_dataset();
        let split = train_test_split(&ds, 0.3, 0, true).unwrap();
        let short = vec![1.0; 3];
        let result = fit_and_score(&split, None, Some(short.as_slice()), &ModelConfig::default(), 0.5);
        assert!(result.is_err());
    }

    #[test]
    fn every_scheme_produces_a_run() {
        let ds = toy_dataset();
        let cfg = ExperimentConfig {
            stratify: true,
            ..ExperimentConfig::default()
        };
        let result = run_on_dataset(&ds, &cfg).unwrap();
        assert_eq!(result.runs.len(), 4);
        assert_eq!(result.n_train + result.n_test, 200);
        for run in &result.runs {
            assert!(run.train.roc_auc > 0.5, "{}: {}", run.scheme, run.train.roc_auc);
            assert!((0.0..=1.0).contains(&run.test.roc_auc));
        }
        assert!(result.best_by_test_auc().is_some());
    }

    #[test]
    fn display_prints_both_subsets() {
        let ds = toy_dataset();
        let split = train_test_split(&ds, 0.3, 0, true).unwrap();
        let run = fit_and_score(&split, None, None, &ModelConfig::default(), 0.5).unwrap();
        let text = run.to_string();
        assert!(text.contains("Train set"));
        assert!(text.contains("Test set"));
        assert!(text.contains("Logistic Regression roc-auc:"));
    }
}
