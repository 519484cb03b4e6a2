//! Weighted, L2-regularised binary logistic regression.
//!
//! The fitted objective is
//!
//! ```text
//! 0.5 * ||w||^2 + C * sum_i s_i * logloss(y_i, x_i . w + b)
//! ```
//!
//! where `s_i` is the per-row weight (class weight times sample weight) and
//! the intercept `b` is not penalised. Raising `s_i` for the minority label
//! makes its misclassification more expensive.
use ndarray::{s, Array1, Array2};

use crate::config::{ModelConfig, ModelType, Solver};
use crate::dataset::{NEGATIVE, POSITIVE};
use crate::error::ModelError;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{cholesky_solve, sigmoid, softplus};

const ARMIJO: f64 = 1e-4;
const MIN_STEP: f64 = 1e-10;
const INTERCEPT_JITTER: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    c: f64,
    max_iter: usize,
    tol: f64,
    fit_intercept: bool,
    solver: Solver,
    learning_rate: f64,
    coefficients: Option<Array1<f64>>,
    intercept: f64,
    n_iter: usize,
    converged: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(&ModelConfig::default())
    }
}

impl LogisticRegression {
    pub fn new(config: &ModelConfig) -> Self {
        let ModelType::LogisticRegression {
            c,
            max_iter,
            tol,
            fit_intercept,
            solver,
        } = config.model_type.clone();

        LogisticRegression {
            c,
            max_iter,
            tol,
            fit_intercept,
            solver,
            learning_rate: config.learning_rate,
            coefficients: None,
            intercept: 0.0,
            n_iter: 0,
            converged: false,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Iterations used by the last fit.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Raw margins `x . w + b`.
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let coef = self.coefficients.as_ref().ok_or(ModelError::NotFitted)?;
        if x.ncols() != coef.len() {
            return Err(ModelError::ShapeMismatch {
                expected: coef.len(),
                actual: x.ncols(),
            });
        }
        Ok(x.dot(coef) + self.intercept)
    }

    /// Fit with explicit per-row weights (already validated and positive).
    pub fn fit_weighted(
        &mut self,
        x: &Array2<f64>,
        y: &[i32],
        weights: &[f64],
    ) -> Result<(), ModelError> {
        let n_samples = x.nrows();
        if y.len() != n_samples {
            return Err(ModelError::ShapeMismatch {
                expected: n_samples,
                actual: y.len(),
            });
        }
        if weights.len() != n_samples {
            return Err(ModelError::ShapeMismatch {
                expected: n_samples,
                actual: weights.len(),
            });
        }
        let n_pos = y.iter().filter(|&&l| l == POSITIVE).count();
        if n_pos == 0 {
            return Err(ModelError::SingleClass(NEGATIVE));
        }
        if n_pos == n_samples {
            return Err(ModelError::SingleClass(POSITIVE));
        }

        let problem = Problem::new(x, y, weights, self.c, self.fit_intercept);
        let mut theta = Array1::<f64>::zeros(problem.n_params());

        let (n_iter, converged) = match self.solver {
            Solver::Newton => problem.newton(&mut theta, self.max_iter, self.tol)?,
            Solver::GradientDescent => {
                problem.gradient_descent(&mut theta, self.max_iter, self.tol, self.learning_rate)
            }
        };

        if !converged {
            log::warn!(
                "Logistic regression ({:?}) did not converge in {} iterations; consider raising max_iter",
                self.solver,
                self.max_iter
            );
        }
        log::debug!(
            "Fitted logistic regression in {} iterations (objective {:.6})",
            n_iter,
            problem.objective(&theta)
        );

        let n_features = x.ncols();
        self.intercept = if self.fit_intercept { theta[n_features] } else { 0.0 };
        self.coefficients = Some(theta.slice(s![..n_features]).to_owned());
        self.n_iter = n_iter;
        self.converged = converged;
        Ok(())
    }
}

impl ClassifierModel for LogisticRegression {
    fn fit(
        &mut self,
        x: &Array2<f64>,
        y: &[i32],
        sample_weight: Option<&[f64]>,
    ) -> Result<(), ModelError> {
        match sample_weight {
            Some(w) => self.fit_weighted(x, y, w),
            None => self.fit_weighted(x, y, &vec![1.0; y.len()]),
        }
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        Ok(self.decision_function(x)?.mapv(sigmoid))
    }

    fn name(&self) -> &str {
        "Logistic Regression"
    }
}

/// Design matrix (with a trailing column of ones when fitting an intercept),
/// 0/1 targets and per-row weights scaled by `C`.
struct Problem {
    design: Array2<f64>,
    target: Array1<f64>,
    weight: Array1<f64>,
    penalty: Array1<f64>,
}

impl Problem {
    fn new(x: &Array2<f64>, y: &[i32], weights: &[f64], c: f64, fit_intercept: bool) -> Self {
        let (n, d) = x.dim();
        let design = if fit_intercept {
            Array2::from_shape_fn((n, d + 1), |(i, j)| if j < d { x[(i, j)] } else { 1.0 })
        } else {
            x.to_owned()
        };
        let n_params = design.ncols();
        Problem {
            design,
            target: y.iter().map(|&l| if l == POSITIVE { 1.0 } else { 0.0 }).collect(),
            weight: weights.iter().map(|&w| c * w).collect(),
            penalty: Array1::from_shape_fn(n_params, |j| if j < d { 1.0 } else { 0.0 }),
        }
    }

    fn n_params(&self) -> usize {
        self.design.ncols()
    }

    fn objective(&self, theta: &Array1<f64>) -> f64 {
        let z = self.design.dot(theta);
        let loss: f64 = z
            .iter()
            .zip(self.target.iter())
            .zip(self.weight.iter())
            .map(|((&z, &t), &w)| w * (softplus(z) - t * z))
            .sum();
        let reg: f64 = theta
            .iter()
            .zip(self.penalty.iter())
            .map(|(&v, &p)| p * v * v)
            .sum();
        0.5 * reg + loss
    }

    /// Returns the gradient and the per-row curvature `w * p * (1 - p)`.
    fn gradient(&self, theta: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        let z = self.design.dot(theta);
        let p = z.mapv(sigmoid);
        let residual = (&p - &self.target) * &self.weight;
        let curvature = p.mapv(|p| p * (1.0 - p)) * &self.weight;
        let grad = self.design.t().dot(&residual) + &self.penalty * theta;
        (grad, curvature)
    }

    fn hessian(&self, curvature: &Array1<f64>) -> Array2<f64> {
        let mut scaled = self.design.clone();
        for (mut row, &c) in scaled.rows_mut().into_iter().zip(curvature.iter()) {
            row *= c;
        }
        let mut h = self.design.t().dot(&scaled);
        for j in 0..self.n_params() {
            h[(j, j)] += self.penalty[j] + INTERCEPT_JITTER;
        }
        h
    }

    fn newton(
        &self,
        theta: &mut Array1<f64>,
        max_iter: usize,
        tol: f64,
    ) -> Result<(usize, bool), ModelError> {
        let mut current = self.objective(theta);
        for iter in 0..max_iter {
            let (grad, curvature) = self.gradient(theta);
            if max_abs(&grad) <= tol {
                return Ok((iter, true));
            }

            let direction = cholesky_solve(&self.hessian(&curvature), &grad)?;
            let slope = grad.dot(&direction);

            let mut step = 1.0;
            let mut candidate = &*theta - &(&direction * step);
            let mut value = self.objective(&candidate);
            while value > current - ARMIJO * step * slope && step > MIN_STEP {
                step *= 0.5;
                candidate = &*theta - &(&direction * step);
                value = self.objective(&candidate);
            }

            let improvement = current - value;
            *theta = candidate;
            current = value;
            log::trace!("newton iter {}: objective {:.8}, step {}", iter + 1, current, step);

            // stalled: no further progress is possible at this precision
            if improvement.abs() <= f64::EPSILON * current.abs().max(1.0) {
                let (grad, _) = self.gradient(theta);
                return Ok((iter + 1, max_abs(&grad) <= tol));
            }
        }
        let (grad, _) = self.gradient(theta);
        Ok((max_iter, max_abs(&grad) <= tol))
    }

    /// Plain gradient descent on the objective divided by the total weight,
    /// so `learning_rate` does not depend on dataset size or weight scale.
    fn gradient_descent(
        &self,
        theta: &mut Array1<f64>,
        max_iter: usize,
        tol: f64,
        learning_rate: f64,
    ) -> (usize, bool) {
        let scale = self.weight.sum().max(f64::MIN_POSITIVE);
        for iter in 0..max_iter {
            let (grad, _) = self.gradient(theta);
            let grad = grad / scale;
            if max_abs(&grad) <= tol {
                return (iter, true);
            }
            theta.scaled_add(-learning_rate, &grad);
        }
        (max_iter, false)
    }
}

fn max_abs(v: &Array1<f64>) -> f64 {
    v.iter().fold(0.0, |m, &x| m.max(x.abs()))
}
