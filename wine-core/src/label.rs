//! Label derivation (training only).
//!
//! Turns the 0-10 quality score into the binary `good_quality` target.
//! This cut-off lives on the quality scale and is unrelated to the
//! probability cut-off in [`crate::model::DecisionThreshold`].

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LABEL_THRESHOLD;

/// Quality score at or above which a wine counts as good
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelThreshold(f64);

impl LabelThreshold {
    pub fn new(cutoff: f64) -> Self {
        Self(cutoff)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for LabelThreshold {
    fn default() -> Self {
        Self(DEFAULT_LABEL_THRESHOLD)
    }
}

/// 1 iff `quality_score >= label_threshold`
pub fn derive_label(quality_score: f64, label_threshold: LabelThreshold) -> u8 {
    u8::from(quality_score >= label_threshold.0)
}

/// Label a whole quality column
pub fn derive_labels(quality_scores: &[f64], label_threshold: LabelThreshold) -> Vec<u8> {
    quality_scores
        .iter()
        .map(|&q| derive_label(q, label_threshold))
        .collect()
}
