//! Standardize-then-classify pipeline.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use super::logistic::{LogisticModel, LogisticRegression};
use super::scaler::StandardScaler;
use super::{check_training_data, Classifier, FitError, FittedClassifier};

/// Unfitted pipeline: a scaler in front of classifier `C`
#[derive(Debug, Clone, Default)]
pub struct Pipeline<C = LogisticRegression> {
    classifier: C,
}

impl<C: Classifier> Pipeline<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }
}

/// The pipeline used for wine quality: scaler + class-balanced logistic regression
pub fn build_model() -> Pipeline {
    Pipeline::new(LogisticRegression::balanced())
}

impl<C: Classifier> Classifier for Pipeline<C> {
    type Fitted = FittedPipeline<C::Fitted>;

    fn fit(self, x: ArrayView2<'_, f64>, y: &[u8]) -> Result<Self::Fitted, FitError> {
        check_training_data(x, y)?;

        let scaler = StandardScaler::fit(x);
        let scaled = scaler.transform(x);
        let classifier = self.classifier.fit(scaled.view(), y)?;

        Ok(FittedPipeline { scaler, classifier })
    }
}

/// Fitted pipeline. Normalization statistics travel with the weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline<F = LogisticModel> {
    pub scaler: StandardScaler,
    pub classifier: F,
}

impl<F: FittedClassifier> FittedClassifier for FittedPipeline<F> {
    fn n_features(&self) -> usize {
        self.scaler.n_features()
    }

    fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Vec<f64> {
        let scaled = self.scaler.transform(x);
        self.classifier.predict_proba(scaled.view())
    }

    fn validate_state(&self) -> Result<(), String> {
        self.scaler.validate_state()?;
        self.classifier.validate_state()?;

        if self.scaler.n_features() != self.classifier.n_features() {
            return Err(format!(
                "scaler has {} features but classifier expects {}",
                self.scaler.n_features(),
                self.classifier.n_features()
            ));
        }
        Ok(())
    }
}
