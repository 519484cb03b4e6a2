//! Feature standardisation.
//!
//! The scaler is fitted on the training subset only and then applied to
//! both subsets, so test statistics never leak into training.
use ndarray::{Array1, Array2, Axis};

/// Simple standard scaler (per-column mean/std).
#[derive(Clone, Debug)]
pub struct Scaler {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl Scaler {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f64 = 1e-12;

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        transform_all(x, self)
    }
}

/// Fit a `Scaler` where rows are samples and columns are features.
///
/// Constant columns get a std of 1 so they map to zero instead of blowing up.
pub fn fit_scaler(x: &Array2<f64>) -> anyhow::Result<Scaler> {
    let (nrows, ncols) = x.dim();
    if nrows == 0 || ncols == 0 {
        anyhow::bail!("fit_scaler requires a non-empty matrix, got {}x{}", nrows, ncols);
    }

    let mean = x
        .mean_axis(Axis(0))
        .ok_or_else(|| anyhow::anyhow!("fit_scaler: empty axis"))?;
    let std = x.std_axis(Axis(0), 0.0).mapv(|s| {
        if s < Scaler::MIN_STD {
            1.0
        } else {
            s
        }
    });

    Ok(Scaler { mean, std })
}

/// Standardise every row with the provided `Scaler`.
pub fn transform_all(x: &Array2<f64>, sc: &Scaler) -> Array2<f64> {
    (x - &sc.mean) / &sc.std
}

/// Fit a scaler and return the transformed matrix in one call.
pub fn fit_transform(x: &Array2<f64>) -> anyhow::Result<Array2<f64>> {
    let sc = fit_scaler(x)?;
    Ok(transform_all(x, &sc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn constant_column_maps_to_zero() {
        let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let t = fit_transform(&x).unwrap();
        for r in 0..3 {
            assert_eq!(t[(r, 1)], 0.0);
        }
    }

    #[test]
    fn empty_matrix_errors() {
        let x = Array2::<f64>::zeros((0, 3));
        assert!(fit_scaler(&x).is_err());
    }
}
