//! End-to-end behaviour of class and sample weighting on imbalanced data.

use std::collections::BTreeMap;

use costsens_classifiers::config::ModelConfig;
use costsens_classifiers::dataset::Dataset;
use costsens_classifiers::experiment::{compare_schemes, fit_and_score, ExperimentConfig, NamedScheme};
use costsens_classifiers::split::{train_test_split, TrainTestSplit};
use costsens_classifiers::weighting::{sample_weights_by_label, ClassWeights, WeightScheme};
use ndarray::{Array1, Array2};

/// 1000 rows, 3% positives. Positives are shifted right on feature 0 and
/// overlap heavily with the negatives; feature 1 is noise.
fn imbalanced() -> Dataset {
    let n = 1000;
    let x = Array2::from_shape_fn((n, 2), |(i, j)| {
        let u = (i * 389 % 1000) as f64 / 1000.0;
        let v = (i * 613 % 997) as f64 / 997.0;
        match j {
            0 if i % 33 == 0 => 1.0 + 2.0 * u,
            0 => -2.0 + 4.0 * u,
            _ => v,
        }
    });
    let y = Array1::from_shape_fn(n, |i| if i % 33 == 0 { 1 } else { -1 });
    Dataset::new(x, y, vec!["signal".into(), "noise".into()]).unwrap()
}

fn split() -> TrainTestSplit {
    train_test_split(&imbalanced(), 0.3, 0, true).unwrap()
}

#[test]
fn minority_penalty_does_not_reduce_recall() {
    let split = split();
    let config = ModelConfig::default();

    let plain = fit_and_score(&split, None, None, &config, 0.5).unwrap();
    let penalised = fit_and_score(
        &split,
        Some(&ClassWeights::new(1.0, 10.0).unwrap()),
        None,
        &config,
        0.5,
    )
    .unwrap();

    assert!(
        penalised.train.confusion.recall() >= plain.train.confusion.recall(),
        "train recall {} < {}",
        penalised.train.confusion.recall(),
        plain.train.confusion.recall()
    );
    assert!(penalised.test.confusion.recall() >= plain.test.confusion.recall());
    assert!(penalised.train.confusion.recall() > 0.0);
}

#[test]
fn class_weight_and_equivalent_sample_weight_agree() {
    let split = split();
    let config = ModelConfig::default();
    let labels = split.train.labels();

    let by_class = fit_and_score(
        &split,
        Some(&ClassWeights::new(1.0, 5.0).unwrap()),
        None,
        &config,
        0.5,
    )
    .unwrap();
    let per_row = sample_weights_by_label(&labels, 1.0, 5.0);
    let by_sample = fit_and_score(&split, None, Some(per_row.as_slice()), &config, 0.5).unwrap();

    assert!((by_class.test.roc_auc - by_sample.test.roc_auc).abs() < 1e-9);
    for (a, b) in by_class.test.scores.iter().zip(by_sample.test.scores.iter()) {
        assert!((a - b).abs() < 1e-8);
    }
}

#[test]
fn signal_feature_gives_useful_auc() {
    let split = split();
    let run = fit_and_score(&split, None, None, &ModelConfig::default(), 0.5).unwrap();
    assert!(run.train.roc_auc > 0.7, "train auc {}", run.train.roc_auc);
    assert!(run.test.roc_auc > 0.6, "test auc {}", run.test.roc_auc);
}

#[test]
fn schemes_share_one_split() {
    let split = split();
    let mut weights = BTreeMap::new();
    weights.insert(1, 20.0);
    let config = ExperimentConfig {
        schemes: vec![
            NamedScheme::new("none", WeightScheme::Unweighted),
            NamedScheme::new("cw", WeightScheme::ClassWeight { weights }),
            NamedScheme::new(
                "both",
                WeightScheme::Combined {
                    class_weight: BTreeMap::new(),
                    sample_weight: (1.0, 20.0),
                },
            ),
        ],
        ..ExperimentConfig::default()
    };

    let runs = compare_schemes(&split, &config).unwrap();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].scheme, "none");
    for run in &runs {
        assert_eq!(run.test.labels.len(), split.test.n_samples());
    }
    // an empty class map is uniform, so "both" is the same fit as "cw"
    assert!((runs[1].test.roc_auc - runs[2].test.roc_auc).abs() < 1e-9);
}

#[test]
fn invalid_scheme_reports_its_name() {
    let split = split();
    let config = ExperimentConfig {
        schemes: vec![NamedScheme::new(
            "broken",
            WeightScheme::SampleWeight {
                negative: 1.0,
                positive: -3.0,
            },
        )],
        ..ExperimentConfig::default()
    };
    let err = compare_schemes(&split, &config).unwrap_err();
    assert!(format!("{:#}", err).contains("broken"));
}
