//! Ranking and threshold metrics for binary scores.
use std::cmp::Ordering;

use serde::Serialize;

use crate::dataset::POSITIVE;

/// Area under the ROC curve.
///
/// Computed as the (optionally weighted) probability that a random positive
/// scores above a random negative, with tied scores counting one half.
/// Errors when only one label is present, lengths differ or a score is NaN.
pub fn roc_auc(scores: &[f64], labels: &[i32], weights: Option<&[f64]>) -> anyhow::Result<f64> {
    check_inputs(scores, labels)?;
    if let Some(w) = weights {
        if w.len() != labels.len() {
            anyhow::bail!(
                "Weights length {} does not match {} labels",
                w.len(),
                labels.len()
            );
        }
    }
    let weight = |i: usize| weights.map_or(1.0, |w| w[i]);

    let (sum_pos, sum_neg) = (0..labels.len()).fold((0.0, 0.0), |(sp, sn), i| {
        if labels[i] == POSITIVE {
            (sp + weight(i), sn)
        } else {
            (sp, sn + weight(i))
        }
    });
    if sum_pos == 0.0 || sum_neg == 0.0 {
        anyhow::bail!("ROC-AUC is undefined when only one class is present");
    }

    let order = argsort(scores, false);

    let mut concordant = 0.0f64;
    let mut cumulative_neg = 0.0f64;
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && scores[order[j]] == scores[order[i]] {
            j += 1;
        }

        let mut group_pos = 0.0f64;
        let mut group_neg = 0.0f64;
        for &idx in &order[i..j] {
            if labels[idx] == POSITIVE {
                group_pos += weight(idx);
            } else {
                group_neg += weight(idx);
            }
        }

        concordant += group_pos * (cumulative_neg + 0.5 * group_neg);
        cumulative_neg += group_neg;
        i = j;
    }

    Ok(concordant / (sum_pos * sum_neg))
}

/// Points of the ROC curve, from the strictest threshold to the loosest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

pub fn roc_curve(scores: &[f64], labels: &[i32]) -> anyhow::Result<RocCurve> {
    check_inputs(scores, labels)?;
    let n_pos = labels.iter().filter(|&&l| l == POSITIVE).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        anyhow::bail!("ROC curve is undefined when only one class is present");
    }

    let order = argsort(scores, true);
    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };

    let (mut tp, mut fp) = (0usize, 0usize);
    for (k, &idx) in order.iter().enumerate() {
        if labels[idx] == POSITIVE {
            tp += 1;
        } else {
            fp += 1;
        }
        let last_of_group = k + 1 == order.len() || scores[order[k + 1]] != scores[idx];
        if last_of_group {
            curve.fpr.push(fp as f64 / n_neg as f64);
            curve.tpr.push(tp as f64 / n_pos as f64);
            curve.thresholds.push(scores[idx]);
        }
    }

    Ok(curve)
}

/// Counts of hard predictions at a fixed threshold, positive label = 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    /// Rows scoring at or above `threshold` are predicted positive.
    pub fn from_scores(scores: &[f64], labels: &[i32], threshold: f64) -> anyhow::Result<Self> {
        check_inputs(scores, labels)?;
        let mut cm = ConfusionMatrix::default();
        for (&s, &l) in scores.iter().zip(labels) {
            match (s >= threshold, l == POSITIVE) {
                (true, true) => cm.true_positive += 1,
                (true, false) => cm.false_positive += 1,
                (false, false) => cm.true_negative += 1,
                (false, true) => cm.false_negative += 1,
            }
        }
        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// Share of actual positives that were caught; 0 when there are none.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn check_inputs(scores: &[f64], labels: &[i32]) -> anyhow::Result<()> {
    if scores.len() != labels.len() {
        anyhow::bail!(
            "Scores and labels must have equal lengths ({} vs {})",
            scores.len(),
            labels.len()
        );
    }
    if let Some(i) = scores.iter().position(|s| s.is_nan()) {
        anyhow::bail!("Score at position {} is NaN", i);
    }
    Ok(())
}

fn argsort(scores: &[f64], descending: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        let ord = scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_and_reversed_ranking() {
        let labels = [-1, -1, 1, 1];
        assert_eq!(roc_auc(&[0.1, 0.2, 0.8, 0.9], &labels, None).unwrap(), 1.0);
        assert_eq!(roc_auc(&[0.9, 0.8, 0.2, 0.1], &labels, None).unwrap(), 0.0);
    }

    #[test]
    fn constant_scores_give_one_half() {
        let labels = [-1, 1, -1, 1, -1];
        assert_eq!(roc_auc(&[0.3; 5], &labels, None).unwrap(), 0.5);
    }

    #[test]
    fn matches_pairwise_count_with_ties() {
        // pairs (pos, neg): (0.8,0.1)=1 (0.8,0.4)=1 (0.8,0.8)=.5
        //                   (0.4,0.1)=1 (0.4,0.4)=.5 (0.4,0.8)=0  -> 4/6
        let scores = [0.1, 0.4, 0.8, 0.8, 0.4];
        let labels = [-1, -1, -1, 1, 1];
        let auc = roc_auc(&scores, &labels, None).unwrap();
        assert!((auc - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn integer_weights_equal_duplicated_rows() {
        let scores = [0.2, 0.6, 0.4, 0.9];
        let labels = [-1, -1, 1, 1];
        let weighted = roc_auc(&scores, &labels, Some(&[2.0, 1.0, 1.0, 3.0][..])).unwrap();

        let dup_scores = [0.2, 0.2, 0.6, 0.4, 0.9, 0.9, 0.9];
        let dup_labels = [-1, -1, -1, 1, 1, 1, 1];
        let duplicated = roc_auc(&dup_scores, &dup_labels, None).unwrap();
        assert!((weighted - duplicated).abs() < 1e-12);
    }

    #[test]
    fn nan_scores_are_rejected() {
        let err = roc_auc(&[f64::NAN, 0.2], &[1, -1], None).unwrap_err();
        assert!(err.to_string().contains("NaN"));
        assert!(roc_curve(&[0.1, f64::NAN], &[1, -1]).is_err());
    }

    #[test]
    fn confusion_matrix_rejects_length_mismatch() {
        assert!(ConfusionMatrix::from_scores(&[0.9, 0.1], &[1], 0.5).is_err());
    }

    #[test]
    fn single_class_errors() {
        assert!(roc_auc(&[0.1, 0.2], &[1, 1], None).is_err());
        assert!(roc_curve(&[0.1, 0.2], &[-1, -1]).is_err());
    }

    #[test]
    fn roc_curve_ends_at_one_one() {
        let curve = roc_curve(&[0.1, 0.4, 0.35, 0.8], &[-1, -1, 1, 1]).unwrap();
        assert_eq!(curve.fpr.first(), Some(&0.0));
        assert_eq!(curve.tpr.last(), Some(&1.0));
        assert_eq!(curve.fpr.last(), Some(&1.0));
        assert!(curve.fpr.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(curve.thresholds.len(), curve.fpr.len());
    }

    #[test]
    fn confusion_matrix_rates() {
        let cm = ConfusionMatrix::from_scores(&[0.9, 0.6, 0.4, 0.2, 0.7], &[1, 1, 1, -1, -1], 0.5)
            .unwrap();
        assert_eq!(cm.true_positive, 2);
        assert_eq!(cm.false_negative, 1);
        assert_eq!(cm.false_positive, 1);
        assert_eq!(cm.true_negative, 1);
        assert!((cm.recall() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.precision() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.accuracy() - 0.6).abs() < 1e-12);
    }
}
