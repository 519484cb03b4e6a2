use ndarray::{Array1, Array2};

use crate::dataset::{NEGATIVE, POSITIVE};
use crate::error::ModelError;

/// A small trait abstraction for binary classifiers trained with per-row
/// misclassification costs. Labels use the crate convention (1 for the
/// minority class, -1 otherwise).
pub trait ClassifierModel {
    /// Fit the model. `sample_weight` is the effective per-row weight
    /// (class weight already folded in); `None` means every row weighs 1.
    fn fit(
        &mut self,
        x: &Array2<f64>,
        y: &[i32],
        sample_weight: Option<&[f64]>,
    ) -> Result<(), ModelError>;

    /// Probability of the positive (1) label for each row.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError>;

    /// Hard labels: 1 where the positive probability reaches `threshold`.
    fn predict(&self, x: &Array2<f64>, threshold: f64) -> Result<Array1<i32>, ModelError> {
        Ok(self
            .predict_proba(x)?
            .mapv(|p| if p >= threshold { POSITIVE } else { NEGATIVE }))
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
