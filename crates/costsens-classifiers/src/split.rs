//! Seeded train/test partitioning.
use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::{Dataset, NEGATIVE, POSITIVE};

/// Two disjoint row subsets of one dataset.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
    /// Row indices into the source dataset, in subset order.
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

impl TrainTestSplit {
    pub fn log_summary(&self) {
        let (train_neg, train_pos) = self.train.class_counts();
        let (test_neg, test_pos) = self.test.class_counts();
        log::info!(
            "Split: {} train rows ({} positive / {} negative), {} test rows ({} positive / {} negative)",
            self.train.n_samples(),
            train_pos,
            train_neg,
            self.test.n_samples(),
            test_pos,
            test_neg
        );
    }
}

/// Split `dataset` into train and test subsets.
///
/// The test side receives `ceil(test_fraction * n)` rows. With `stratify`
/// each label is shuffled and cut on its own (`round(test_fraction * n_label)`
/// test rows per label) so both sides keep the class ratio.
pub fn train_test_split(
    dataset: &Dataset,
    test_fraction: f64,
    seed: u64,
    stratify: bool,
) -> Result<TrainTestSplit> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        anyhow::bail!("test_fraction must be in (0, 1), got {}", test_fraction);
    }

    let n_samples = dataset.n_samples();
    let mut rng = StdRng::seed_from_u64(seed);

    let (train_indices, test_indices) = if stratify {
        let mut train = Vec::new();
        let mut test = Vec::new();
        for label in [POSITIVE, NEGATIVE] {
            let mut rows: Vec<usize> = (0..n_samples).filter(|&i| dataset.y[i] == label).collect();
            rows.shuffle(&mut rng);
            let n_test = (rows.len() as f64 * test_fraction).round() as usize;
            test.extend_from_slice(&rows[..n_test]);
            train.extend_from_slice(&rows[n_test..]);
        }
        train.shuffle(&mut rng);
        test.shuffle(&mut rng);
        (train, test)
    } else {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(&mut rng);
        let n_test = (n_samples as f64 * test_fraction).ceil() as usize;
        let train = indices.split_off(n_test);
        (train, indices)
    };

    if train_indices.is_empty() || test_indices.is_empty() {
        anyhow::bail!(
            "Splitting {} rows with test_fraction {} leaves an empty subset",
            n_samples,
            test_fraction
        );
    }

    let split = TrainTestSplit {
        train: dataset.select_rows(&train_indices),
        test: dataset.select_rows(&test_indices),
        train_indices,
        test_indices,
    };
    split.log_summary();
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};
    use std::collections::HashSet;

    fn dataset(n: usize, n_pos: usize) -> Dataset {
        let x = Array2::from_shape_fn((n, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(n, |i| if i < n_pos { 1 } else { -1 });
        Dataset::new(x, y, vec!["f".into()]).unwrap()
    }

    #[test]
    fn split_is_disjoint_and_covering() {
        let ds = dataset(10, 2);
        let split = train_test_split(&ds, 0.3, 0, false).unwrap();
        assert_eq!(split.test_indices.len(), 3);
        assert_eq!(split.train_indices.len(), 7);

        let train: HashSet<_> = split.train_indices.iter().copied().collect();
        let test: HashSet<_> = split.test_indices.iter().copied().collect();
        assert!(train.is_disjoint(&test));
        assert_eq!(train.len() + test.len(), 10);
    }

    #[test]
    fn test_size_rounds_up() {
        let ds = dataset(7, 2);
        let split = train_test_split(&ds, 0.3, 1, false).unwrap();
        // ceil(2.1) = 3
        assert_eq!(split.test.n_samples(), 3);
        assert_eq!(split.train.n_samples(), 4);
    }

    #[test]
    fn same_seed_same_split() {
        let ds = dataset(50, 5);
        let a = train_test_split(&ds, 0.3, 42, false).unwrap();
        let b = train_test_split(&ds, 0.3, 42, false).unwrap();
        assert_eq!(a.train_indices, b.train_indices);
        assert_eq!(a.test_indices, b.test_indices);
    }

    #[test]
    fn rows_follow_their_indices() {
        let ds = dataset(20, 4);
        let split = train_test_split(&ds, 0.25, 3, false).unwrap();
        for (pos, &row) in split.test_indices.iter().enumerate() {
            assert_eq!(split.test.x[(pos, 0)], row as f64);
            assert_eq!(split.test.y[pos], ds.y[row]);
        }
    }

    #[test]
    fn stratified_keeps_class_ratio() {
        let ds = dataset(100, 10);
        let split = train_test_split(&ds, 0.3, 0, true).unwrap();
        assert_eq!(split.test.class_counts(), (27, 3));
        assert_eq!(split.train.class_counts(), (63, 7));
    }

    #[test]
    fn empty_subset_is_an_error() {
        // ceil(0.9 * 1) = 1 leaves no training rows
        let err = train_test_split(&dataset(1, 1), 0.9, 0, false).unwrap_err();
        assert!(err.to_string().contains("empty subset"));
        // ceil(0.3 * 2) = 1 leaves one row on each side
        assert!(train_test_split(&dataset(2, 1), 0.3, 0, false).is_ok());
        // round(0.3 * 1) = 0 test rows for either label
        assert!(train_test_split(&dataset(2, 1), 0.3, 0, true).is_err());
    }

    #[test]
    fn rejects_bad_fraction() {
        let ds = dataset(10, 2);
        assert!(train_test_split(&ds, 0.0, 0, false).is_err());
        assert!(train_test_split(&ds, 1.0, 0, false).is_err());
        assert!(train_test_split(&ds, f64::NAN, 0, false).is_err());
    }
}
