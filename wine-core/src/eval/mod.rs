//! Evaluation Module
//!
//! Scores a fitted model on labeled rows and applies the deployment decision
//! rule, so the reported numbers describe the served behavior exactly.

pub mod metrics;
pub mod report;

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{DecisionThreshold, FittedClassifier};

pub use metrics::{compute_metrics, confusion_matrix, roc_auc, ConfusionMatrix, Metrics};
pub use report::{classification_report, ClassScores, ClassificationReport};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// ROC-AUC is undefined with a single class
    #[error("labels contain only class {present} ({samples} samples); ROC-AUC is undefined")]
    Degenerate { present: u8, samples: usize },

    #[error("length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Result of [`evaluate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub threshold: DecisionThreshold,
    pub metrics: Metrics,
    pub confusion_matrix: ConfusionMatrix,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification_report: Option<ClassificationReport>,
}

/// Binary decisions with the same rule the inference service uses
pub fn predict_with_threshold(y_proba: &[f64], threshold: DecisionThreshold) -> Vec<u8> {
    y_proba.iter().map(|&p| threshold.decide(p)).collect()
}

/// Score `x`, threshold the probabilities, and compare against `y`.
/// `verbose` adds the per-class report.
pub fn evaluate<M: FittedClassifier + ?Sized>(
    model: &M,
    x: ArrayView2<'_, f64>,
    y: &[u8],
    threshold: DecisionThreshold,
    verbose: bool,
) -> Result<Evaluation, EvaluationError> {
    metrics::check_lengths(y.len(), x.nrows())?;

    let y_proba = model.predict_proba(x);
    let y_pred = predict_with_threshold(&y_proba, threshold);

    let metrics = compute_metrics(y, &y_pred, &y_proba)?;
    let confusion_matrix = confusion_matrix(y, &y_pred)?;
    let report = if verbose {
        Some(classification_report(y, &y_pred)?)
    } else {
        None
    };

    Ok(Evaluation {
        threshold,
        metrics,
        confusion_matrix,
        classification_report: report,
    })
}
