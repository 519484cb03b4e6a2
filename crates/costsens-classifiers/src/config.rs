use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Step size for first-order solvers. Newton ignores it.
    pub learning_rate: f64,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Optimisation routine used to fit logistic regression.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Solver {
    Newton,
    GradientDescent,
}

impl FromStr for Solver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "newton" | "newton_cg" => Ok(Solver::Newton),
            "gradient_descent" | "gd" => Ok(Solver::GradientDescent),
            _ => Err(format!(
                "Unknown solver: {}. Valid options are: newton, gradient_descent",
                s
            )),
        }
    }
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    LogisticRegression {
        /// Inverse L2 regularisation strength.
        c: f64,
        max_iter: usize,
        tol: f64,
        fit_intercept: bool,
        solver: Solver,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::LogisticRegression {
            c: 1.0,
            max_iter: 100,
            tol: 1e-6,
            fit_intercept: true,
            solver: Solver::Newton,
        }
    }
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::LogisticRegression { .. } => "Logistic Regression",
        }
    }

    /// Replace the solver, keeping every other hyper-parameter.
    pub fn with_solver(self, new_solver: Solver) -> Self {
        match self {
            ModelType::LogisticRegression {
                c,
                max_iter,
                tol,
                fit_intercept,
                ..
            } => ModelType::LogisticRegression {
                c,
                max_iter,
                tol,
                fit_intercept,
                solver: new_solver,
            },
        }
    }

    /// Replace the inverse regularisation strength.
    pub fn with_c(self, new_c: f64) -> Self {
        match self {
            ModelType::LogisticRegression {
                max_iter,
                tol,
                fit_intercept,
                solver,
                ..
            } => ModelType::LogisticRegression {
                c: new_c,
                max_iter,
                tol,
                fit_intercept,
                solver,
            },
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logit" | "logistic" | "logistic_regression" => Ok(ModelType::default()),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: logistic_regression",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f64, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            model_type,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            model_type: ModelType::default(),
        }
    }
}
