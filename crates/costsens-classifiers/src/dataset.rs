//! In-memory tabular dataset with a binary {-1, +1} label column.
//!
//! `+1` is the minority ("positive") class throughout the crate. Rows are
//! aligned across the feature matrix and the label vector.
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;

pub const POSITIVE: i32 = 1;
pub const NEGATIVE: i32 = -1;

#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Array2<f64>,
    pub y: Array1<i32>,
    pub feature_names: Vec<String>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, y: Array1<i32>, feature_names: Vec<String>) -> anyhow::Result<Self> {
        if x.nrows() != y.len() {
            anyhow::bail!(
                "Feature matrix has {} rows but {} labels were given",
                x.nrows(),
                y.len()
            );
        }
        if feature_names.len() != x.ncols() {
            anyhow::bail!(
                "Feature matrix has {} columns but {} feature names were given",
                x.ncols(),
                feature_names.len()
            );
        }
        if let Some((row, label)) = y
            .iter()
            .enumerate()
            .find(|(_, &l)| l != POSITIVE && l != NEGATIVE)
        {
            anyhow::bail!("Invalid label {} at row {}; expected -1 or 1", label, row);
        }

        Ok(Dataset {
            x,
            y,
            feature_names,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Number of rows per label as `(negatives, positives)`.
    pub fn class_counts(&self) -> (usize, usize) {
        count_labels(self.y.iter())
    }

    pub fn positive_fraction(&self) -> f64 {
        if self.n_samples() == 0 {
            return 0.0;
        }
        let (_, positives) = self.class_counts();
        positives as f64 / self.n_samples() as f64
    }

    pub fn labels(&self) -> Vec<i32> {
        self.y.to_vec()
    }

    pub fn log_summary(&self) {
        let (negatives, positives) = self.class_counts();
        log::info!(
            "Dataset: {} rows ({} positive / {} negative, {:.2}% positive), {} feature columns",
            self.n_samples(),
            positives,
            negatives,
            self.positive_fraction() * 100.0,
            self.n_features()
        );
    }

    /// Build a new dataset containing only `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Uniformly sample `n` rows without replacement.
    ///
    /// Requests larger than the dataset return every row (shuffled). The
    /// same `seed` always yields the same rows.
    pub fn sample(&self, n: usize, seed: u64) -> Dataset {
        let n = n.min(self.n_samples());
        let mut rng = StdRng::seed_from_u64(seed);
        let indices = sample(&mut rng, self.n_samples(), n).into_vec();
        log::debug!("Sampled {} of {} rows (seed {})", n, self.n_samples(), seed);
        self.select_rows(&indices)
    }
}

/// Count `(negatives, positives)` over a sequence of labels.
pub fn count_labels<'a, I>(labels: I) -> (usize, usize)
where
    I: IntoIterator<Item = &'a i32>,
{
    labels.into_iter().fold((0, 0), |(neg, pos), &l| {
        if l == POSITIVE {
            (neg, pos + 1)
        } else {
            (neg + 1, pos)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Dataset {
        let x = Array2::from_shape_vec(
            (5, 2),
            vec![0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0, 1.0],
        )
        .unwrap();
        let y = Array1::from_vec(vec![-1, -1, -1, -1, 1]);
        Dataset::new(x, y, vec!["a".into(), "b".into()]).unwrap()
    }

    #[test]
    fn rejects_bad_labels() {
        let x = Array2::zeros((2, 1));
        let y = Array1::from_vec(vec![1, 2]);
        assert!(Dataset::new(x, y, vec!["a".into()]).is_err());
    }

    #[test]
    fn rejects_row_mismatch() {
        let x = Array2::zeros((3, 1));
        let y = Array1::from_vec(vec![1, -1]);
        assert!(Dataset::new(x, y, vec!["a".into()]).is_err());
    }

    #[test]
    fn counts_classes() {
        let ds = toy();
        assert_eq!(ds.class_counts(), (4, 1));
        assert!((ds.positive_fraction() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn select_rows_keeps_alignment() {
        let ds = toy();
        let sub = ds.select_rows(&[4, 0]);
        assert_eq!(sub.y.to_vec(), vec![1, -1]);
        assert_eq!(sub.x[(0, 0)], 4.0);
        assert_eq!(sub.x[(1, 0)], 0.0);
    }

    #[test]
    fn sample_is_seeded_and_capped() {
        let ds = toy();
        let a = ds.sample(3, 7);
        let b = ds.sample(3, 7);
        assert_eq!(a.n_samples(), 3);
        assert_eq!(a.x, b.x);
        assert_eq!(ds.sample(100, 1).n_samples(), 5);
    }
}
