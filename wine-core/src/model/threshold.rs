//! Decision Threshold
//!
//! The probability cut-off baked into an artifact. Evaluation and serving both
//! decide through [`DecisionThreshold::decide`], so reported metrics describe
//! exactly what the deployed service does.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_DECISION_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("decision threshold must be a finite value in [0, 1], got {0}")]
pub struct ThresholdError(pub f64);

/// Probability cut-off in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DecisionThreshold(f64);

impl DecisionThreshold {
    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ThresholdError(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// 1 if `probability >= threshold`, else 0.
    /// Ties go to the positive class.
    pub fn decide(&self, probability: f64) -> u8 {
        u8::from(probability >= self.0)
    }
}

impl Default for DecisionThreshold {
    fn default() -> Self {
        Self(DEFAULT_DECISION_THRESHOLD)
    }
}

impl TryFrom<f64> for DecisionThreshold {
    type Error = ThresholdError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DecisionThreshold> for f64 {
    fn from(threshold: DecisionThreshold) -> Self {
        threshold.0
    }
}

impl fmt::Display for DecisionThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
