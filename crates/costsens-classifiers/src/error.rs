use std::error::Error;
use std::fmt;

/// Validation failures for class or sample weights.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightError {
    /// A weight at `index` was zero, negative, NaN or infinite.
    NonPositive { index: usize, value: f64 },
    /// Sample weights must line up with the training labels.
    LengthMismatch { expected: usize, actual: usize },
    /// Class weight given for a label outside {-1, +1}.
    UnknownLabel(i32),
    /// Balanced weights need at least one row of every label.
    MissingClass(i32),
}

impl fmt::Display for WeightError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WeightError::NonPositive { index, value } => write!(
                f,
                "Weight at position {} must be finite and positive, got {}",
                index, value
            ),
            WeightError::LengthMismatch { expected, actual } => write!(
                f,
                "Sample weights length {} does not match {} training rows",
                actual, expected
            ),
            WeightError::UnknownLabel(label) => {
                write!(f, "Class weight given for unknown label {} (expected -1 or 1)", label)
            }
            WeightError::MissingClass(label) => {
                write!(f, "Label {} does not occur in the training labels", label)
            }
        }
    }
}

impl Error for WeightError {}

/// Failures raised by model fitting and prediction.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    NotFitted,
    ShapeMismatch { expected: usize, actual: usize },
    SingleClass(i32),
    NotPositiveDefinite,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelError::NotFitted => write!(f, "Model must be fitted before predicting"),
            ModelError::ShapeMismatch { expected, actual } => {
                write!(f, "Expected {} values, got {}", expected, actual)
            }
            ModelError::SingleClass(label) => write!(
                f,
                "Training labels contain only class {}; both -1 and 1 are required",
                label
            ),
            ModelError::NotPositiveDefinite => {
                write!(f, "Hessian is not positive definite; try a smaller C")
            }
        }
    }
}

impl Error for ModelError {}
