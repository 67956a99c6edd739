//! Model Module - Transform-then-classify pipeline
//!
//! A classifier is a two-step capability: [`Classifier::fit`] consumes the
//! unfitted configuration and returns a [`FittedClassifier`], which only
//! scores. Any pair of types satisfying these traits can replace the default
//! standard-scaler + logistic-regression pipeline without touching the
//! artifact or the inference service.

pub mod logistic;
pub mod pipeline;
pub mod scaler;
pub mod threshold;

use ndarray::ArrayView2;
use thiserror::Error;

// Re-export common types
pub use logistic::{ClassWeight, LogisticModel, LogisticRegression};
pub use pipeline::{build_model, FittedPipeline, Pipeline};
pub use scaler::StandardScaler;
pub use threshold::{DecisionThreshold, ThresholdError};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("training set has no feature columns")]
    NoFeatures,

    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    LengthMismatch { rows: usize, labels: usize },

    #[error("label {0} is not binary (expected 0 or 1)")]
    InvalidLabel(u8),

    #[error("training labels contain a single class ({0}); both classes are required")]
    SingleClass(u8),

    #[error("non-finite value at row {row}, column {col}")]
    NonFinite { row: usize, col: usize },

    #[error("Newton system is singular at iteration {0}")]
    Singular(usize),
}

// ============================================================================
// CLASSIFIER TRAITS
// ============================================================================

/// Unfitted model configuration
pub trait Classifier {
    type Fitted: FittedClassifier;

    /// Fit on `x` (one row per example) and binary labels `y`
    fn fit(self, x: ArrayView2<'_, f64>, y: &[u8]) -> Result<Self::Fitted, FitError>;
}

/// Fitted, read-only scorer. Shared across request handlers, hence `Send + Sync`.
pub trait FittedClassifier: Send + Sync {
    /// Number of input columns expected by [`FittedClassifier::predict_proba`]
    fn n_features(&self) -> usize;

    /// Probability of the positive class, one per row of `x`.
    ///
    /// Panics if `x` does not have [`FittedClassifier::n_features`] columns.
    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Vec<f64>;

    /// Check the internal state after deserialization
    fn validate_state(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Shared input checks for every `fit` implementation
pub(crate) fn check_training_data(x: ArrayView2<'_, f64>, y: &[u8]) -> Result<(), FitError> {
    let (rows, cols) = x.dim();

    if rows == 0 {
        return Err(FitError::EmptyTrainingSet);
    }
    if cols == 0 {
        return Err(FitError::NoFeatures);
    }
    if rows != y.len() {
        return Err(FitError::LengthMismatch {
            rows,
            labels: y.len(),
        });
    }
    if let Some(&bad) = y.iter().find(|&&label| label > 1) {
        return Err(FitError::InvalidLabel(bad));
    }
    if let Some(((row, col), _)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(FitError::NonFinite { row, col });
    }

    let positives = y.iter().filter(|&&label| label == 1).count();
    if positives == 0 {
        return Err(FitError::SingleClass(0));
    }
    if positives == rows {
        return Err(FitError::SingleClass(1));
    }

    Ok(())
}
