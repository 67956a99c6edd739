//! Inference Service - one artifact, loaded once, read-only afterwards.
//!
//! A value of [`InferenceService`] only exists after a successful load, so a
//! service that can answer requests always has a complete model behind it.
//! All methods take `&self`; share it across handlers behind an `Arc`.

use std::path::{Path, PathBuf};

use ndarray::{Array1, Axis};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::{load_artifact, Artifact, ArtifactLoadError};
use crate::features::{FeatureSchema, MissingFeaturesError, PredictionRequest};
use crate::model::{DecisionThreshold, FittedClassifier, FittedPipeline};

/// `GET /health` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_path: String,
    pub threshold: f64,
    pub n_features: usize,
}

/// `POST /predict` success payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub good_quality: u8,
    pub probability: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Error)]
pub enum PredictError {
    #[error(transparent)]
    MissingFeatures(#[from] MissingFeaturesError),

    /// Every feature was present, but the values push the model outside
    /// floating-point range and no probability can be given
    #[error("feature values are out of range for the model (score {score})")]
    NonFiniteScore { score: f64 },
}

#[derive(Debug)]
pub struct InferenceService<M = FittedPipeline> {
    artifact: Artifact<M>,
    model_path: PathBuf,
}

impl<M> InferenceService<M>
where
    M: FittedClassifier + DeserializeOwned,
{
    /// Load the artifact at `path`. Any failure is returned to the caller,
    /// which must not start serving.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactLoadError> {
        let path = path.as_ref();
        let artifact = load_artifact(path)?;
        Ok(Self::from_artifact(artifact, path))
    }
}

impl<M: FittedClassifier> InferenceService<M> {
    /// Wrap an already validated artifact
    pub fn from_artifact(artifact: Artifact<M>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            artifact,
            model_path: model_path.into(),
        }
    }

    pub fn features(&self) -> &FeatureSchema {
        self.artifact.features()
    }

    pub fn threshold(&self) -> DecisionThreshold {
        self.artifact.threshold()
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            model_path: self.model_path.display().to_string(),
            threshold: self.threshold().value(),
            n_features: self.features().len(),
        }
    }

    /// Validate, score one row, and apply the artifact's threshold.
    /// Nothing is scored unless every schema feature is present, and no
    /// decision is made unless the probability lies in [0, 1].
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, PredictError> {
        let values = self.features().validate(request)?;
        let row = Array1::from(values).insert_axis(Axis(0));

        let probability = self.artifact.model().predict_proba(row.view())[0];
        if !(0.0..=1.0).contains(&probability) {
            log::warn!("Refusing to decide on non-finite score {}", probability);
            return Err(PredictError::NonFiniteScore { score: probability });
        }
        let threshold = self.threshold();

        Ok(PredictionResponse {
            good_quality: threshold.decide(probability),
            probability,
            threshold: threshold.value(),
        })
    }
}
