//! Decision-quality metrics for binary labels.

use serde::{Deserialize, Serialize};

use super::EvaluationError;

/// Headline metrics of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub roc_auc: f64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// 2x2 confusion matrix, rows = truth, columns = prediction: `[[tn, fp], [fn, tp]]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "[[usize; 2]; 2]", from = "[[usize; 2]; 2]")]
pub struct ConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionMatrix {
    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    pub fn as_array(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fp], [self.fn_, self.tp]]
    }
}

impl From<ConfusionMatrix> for [[usize; 2]; 2] {
    fn from(cm: ConfusionMatrix) -> Self {
        cm.as_array()
    }
}

impl From<[[usize; 2]; 2]> for ConfusionMatrix {
    fn from(m: [[usize; 2]; 2]) -> Self {
        Self {
            tn: m[0][0],
            fp: m[0][1],
            fn_: m[1][0],
            tp: m[1][1],
        }
    }
}

pub(crate) fn check_lengths(expected: usize, other: usize) -> Result<(), EvaluationError> {
    if expected != other {
        return Err(EvaluationError::LengthMismatch {
            expected,
            actual: other,
        });
    }
    Ok(())
}

/// Count outcomes. Any non-zero label counts as positive.
pub fn confusion_matrix(y_true: &[u8], y_pred: &[u8]) -> Result<ConfusionMatrix, EvaluationError> {
    check_lengths(y_true.len(), y_pred.len())?;

    let mut cm = ConfusionMatrix::default();
    for (&t, &p) in y_true.iter().zip(y_pred) {
        match (t != 0, p != 0) {
            (false, false) => cm.tn += 1,
            (false, true) => cm.fp += 1,
            (true, false) => cm.fn_ += 1,
            (true, true) => cm.tp += 1,
        }
    }
    Ok(cm)
}

/// `num / den`, or 0 with a warning when the denominator is zero
pub(crate) fn ratio_or_zero(num: usize, den: usize, what: &str) -> f64 {
    if den == 0 {
        log::warn!("{} is ill-defined (no samples in denominator); reporting 0.0", what);
        0.0
    } else {
        num as f64 / den as f64
    }
}

pub(crate) fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Area under the ROC curve via the rank-sum statistic.
///
/// Tied scores share their average rank, so ties count as half a win.
pub fn roc_auc(y_true: &[u8], y_score: &[f64]) -> Result<f64, EvaluationError> {
    check_lengths(y_true.len(), y_score.len())?;

    let positives = y_true.iter().filter(|&&t| t != 0).count();
    let negatives = y_true.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(EvaluationError::Degenerate {
            present: if positives == 0 { 0 } else { 1 },
            samples: y_true.len(),
        });
    }

    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| y_score[a].total_cmp(&y_score[b]));

    // Sum of 1-based ranks of the positives, averaging over tie groups
    let mut rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && y_score[order[end]] == y_score[order[start]] {
            end += 1;
        }
        let avg_rank = (start + 1 + end) as f64 / 2.0;
        let tied_positives = order[start..end].iter().filter(|&&i| y_true[i] != 0).count();
        rank_sum += avg_rank * tied_positives as f64;
        start = end;
    }

    let p = positives as f64;
    let n = negatives as f64;
    Ok((rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

/// ROC-AUC, accuracy, precision, recall and F1 for the positive class
pub fn compute_metrics(
    y_true: &[u8],
    y_pred: &[u8],
    y_proba: &[f64],
) -> Result<Metrics, EvaluationError> {
    let roc_auc = roc_auc(y_true, y_proba)?;
    let cm = confusion_matrix(y_true, y_pred)?;

    let precision = ratio_or_zero(cm.tp, cm.tp + cm.fp, "precision");
    let recall = ratio_or_zero(cm.tp, cm.tp + cm.fn_, "recall");

    Ok(Metrics {
        roc_auc,
        accuracy: ratio_or_zero(cm.tp + cm.tn, cm.total(), "accuracy"),
        precision,
        recall,
        f1: f1_score(precision, recall),
    })
}
