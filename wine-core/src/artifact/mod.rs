//! Artifact Module - The single unit of deployment
//!
//! An artifact binds a fitted model to the feature schema it was trained on
//! and to the decision threshold it is served with. It is written once at the
//! end of training and replaced wholesale on retrain.
//!
//! On disk it is one JSON document:
//!
//! ```text
//! {
//!   "model":       { "scaler": {...}, "classifier": {...} },
//!   "features":    ["fixed acidity", ...],
//!   "threshold":   0.7,
//!   "layout_hash": 2864712811
//! }
//! ```

pub mod storage;
pub mod validate;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::features::FeatureSchema;
use crate::model::{DecisionThreshold, FittedPipeline};

pub use storage::{load_artifact, save_artifact};
pub use validate::{ArtifactLoadError, ArtifactSaveError};

/// Immutable {model, schema, threshold} triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact<M = FittedPipeline> {
    model: M,
    features: FeatureSchema,
    threshold: DecisionThreshold,
    /// CRC32 of `features`, checked on load
    layout_hash: u32,
}

impl<M> Artifact<M> {
    pub fn new(model: M, features: FeatureSchema, threshold: DecisionThreshold) -> Self {
        let layout_hash = features.layout_hash();
        Self {
            model,
            features,
            threshold,
            layout_hash,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn features(&self) -> &FeatureSchema {
        &self.features
    }

    pub fn threshold(&self) -> DecisionThreshold {
        self.threshold
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }
}
