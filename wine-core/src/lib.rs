//! Wine Quality Classifier - Core
//!
//! Trains a calibrated good/not-good classifier on physicochemical wine
//! measurements and serves it under a fixed artifact contract.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   dataset    │──▶│    label     │──▶│    model     │──▶│     eval     │
//! │ (download +  │   │ (quality >=  │   │ (scaler +    │   │ (auc, f1,    │
//! │  split)      │   │  cut-off)    │   │  logistic)   │   │  confusion)  │
//! └──────────────┘   └──────────────┘   └──────┬───────┘   └──────────────┘
//!                                              ▼
//!                 ┌──────────────────────────────────────────┐
//!                 │ artifact = {model, features, threshold}  │
//!                 └────────────────────┬─────────────────────┘
//!                                      ▼
//!                 ┌──────────────────────────────────────────┐
//!                 │ inference: validate -> score -> decide   │
//!                 └──────────────────────────────────────────┘
//! ```
//!
//! The feature schema and the decision threshold are fixed at training time
//! and travel inside the artifact; serving never rebuilds either.

pub mod artifact;
pub mod constants;
pub mod dataset;
pub mod eval;
pub mod features;
pub mod inference;
pub mod label;
pub mod model;
pub mod train;

pub use artifact::{load_artifact, save_artifact, Artifact, ArtifactLoadError, ArtifactSaveError};
pub use features::{FeatureSchema, MissingFeaturesError, PredictionRequest};
pub use inference::{HealthStatus, InferenceService, PredictError, PredictionResponse};
pub use label::{derive_label, LabelThreshold};
pub use model::{DecisionThreshold, FittedClassifier, FittedPipeline};
pub use train::{TrainConfig, TrainingError, TrainingSummary};
