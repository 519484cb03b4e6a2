//! Misclassification-cost weights.
//!
//! Costs are expressed either per label (`class_weight`) or per training row
//! (`sample_weight`). A [`WeightScheme`] is the serialisable description used
//! in configs; [`WeightScheme::resolve`] turns it into concrete
//! [`TrainingWeights`] for one training set. The model only ever sees the
//! per-row product returned by [`TrainingWeights::effective`].
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{count_labels, NEGATIVE, POSITIVE};
use crate::error::WeightError;

/// Penalty applied to every row of a label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassWeights {
    pub negative: f64,
    pub positive: f64,
}

impl Default for ClassWeights {
    fn default() -> Self {
        Self::uniform()
    }
}

impl ClassWeights {
    pub fn new(negative: f64, positive: f64) -> Result<Self, WeightError> {
        check_positive(0, negative)?;
        check_positive(1, positive)?;
        Ok(Self { negative, positive })
    }

    pub fn uniform() -> Self {
        Self {
            negative: 1.0,
            positive: 1.0,
        }
    }

    /// Build from a label -> penalty map. Labels missing from the map keep
    /// a penalty of 1.
    pub fn from_map(map: &BTreeMap<i32, f64>) -> Result<Self, WeightError> {
        let mut weights = Self::uniform();
        for (&label, &value) in map {
            match label {
                POSITIVE => weights.positive = value,
                NEGATIVE | 0 => weights.negative = value,
                other => return Err(WeightError::UnknownLabel(other)),
            }
        }
        Self::new(weights.negative, weights.positive)
    }

    /// `n_samples / (2 * count(label))`, which gives both labels the same
    /// total weight.
    pub fn balanced(labels: &[i32]) -> Result<Self, WeightError> {
        let (negatives, positives) = count_labels(labels);
        if positives == 0 {
            return Err(WeightError::MissingClass(POSITIVE));
        }
        if negatives == 0 {
            return Err(WeightError::MissingClass(NEGATIVE));
        }
        let n = labels.len() as f64;
        Ok(Self {
            negative: n / (2.0 * negatives as f64),
            positive: n / (2.0 * positives as f64),
        })
    }

    pub fn weight_for(&self, label: i32) -> f64 {
        if label == POSITIVE {
            self.positive
        } else {
            self.negative
        }
    }
}

/// One weight per row: `positive` where the label is 1, `negative` elsewhere.
pub fn sample_weights_by_label(labels: &[i32], negative: f64, positive: f64) -> Vec<f64> {
    labels
        .iter()
        .map(|&l| if l == POSITIVE { positive } else { negative })
        .collect()
}

/// Serialisable weighting configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightScheme {
    #[default]
    Unweighted,
    ClassWeight {
        weights: BTreeMap<i32, f64>,
    },
    Balanced,
    SampleWeight {
        negative: f64,
        positive: f64,
    },
    Combined {
        class_weight: BTreeMap<i32, f64>,
        sample_weight: (f64, f64),
    },
}

impl WeightScheme {
    /// Compute concrete weights for a training set with `labels`.
    pub fn resolve(&self, labels: &[i32]) -> Result<TrainingWeights, WeightError> {
        let weights = match self {
            WeightScheme::Unweighted => TrainingWeights::default(),
            WeightScheme::ClassWeight { weights } => TrainingWeights {
                class_weight: Some(ClassWeights::from_map(weights)?),
                sample_weight: None,
            },
            WeightScheme::Balanced => TrainingWeights {
                class_weight: Some(ClassWeights::balanced(labels)?),
                sample_weight: None,
            },
            WeightScheme::SampleWeight { negative, positive } => TrainingWeights {
                class_weight: None,
                sample_weight: Some(sample_weights_by_label(labels, *negative, *positive)),
            },
            WeightScheme::Combined {
                class_weight,
                sample_weight: (negative, positive),
            } => TrainingWeights {
                class_weight: Some(ClassWeights::from_map(class_weight)?),
                sample_weight: Some(sample_weights_by_label(labels, *negative, *positive)),
            },
        };
        weights.effective(labels)?;
        Ok(weights)
    }

    pub fn describe(&self) -> String {
        match self {
            WeightScheme::Unweighted => "no weighting".to_string(),
            WeightScheme::ClassWeight { weights } => format!("class_weight {}", format_map(weights)),
            WeightScheme::Balanced => "class_weight balanced".to_string(),
            WeightScheme::SampleWeight { negative, positive } => {
                format!("sample_weight {{-1: {}, 1: {}}}", negative, positive)
            }
            WeightScheme::Combined {
                class_weight,
                sample_weight: (negative, positive),
            } => format!(
                "class_weight {} x sample_weight {{-1: {}, 1: {}}}",
                format_map(class_weight),
                negative,
                positive
            ),
        }
    }
}

fn format_map(map: &BTreeMap<i32, f64>) -> String {
    let entries: Vec<String> = map.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
    format!("{{{}}}", entries.join(", "))
}

/// Concrete weights for one training set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingWeights {
    pub class_weight: Option<ClassWeights>,
    pub sample_weight: Option<Vec<f64>>,
}

impl TrainingWeights {
    /// Per-row weight: class weight of the row's label times its sample weight.
    pub fn effective(&self, labels: &[i32]) -> Result<Vec<f64>, WeightError> {
        effective_weights(labels, self.class_weight.as_ref(), self.sample_weight.as_deref())
    }
}

/// Combine optional class and sample weights into one validated vector.
pub fn effective_weights(
    labels: &[i32],
    class_weight: Option<&ClassWeights>,
    sample_weight: Option<&[f64]>,
) -> Result<Vec<f64>, WeightError> {
    if let Some(sw) = sample_weight {
        if sw.len() != labels.len() {
            return Err(WeightError::LengthMismatch {
                expected: labels.len(),
                actual: sw.len(),
            });
        }
    }

    let mut out = Vec::with_capacity(labels.len());
    for (i, &label) in labels.iter().enumerate() {
        let cw = class_weight.map_or(1.0, |c| c.weight_for(label));
        let sw = sample_weight.map_or(1.0, |s| s[i]);
        check_positive(i, sw)?;
        let w = cw * sw;
        check_positive(i, w)?;
        out.push(w);
    }
    Ok(out)
}

fn check_positive(index: usize, value: f64) -> Result<(), WeightError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WeightError::NonPositive { index, value })
    }
}
