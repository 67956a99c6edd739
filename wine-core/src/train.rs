//! Training run: data -> labels -> split -> fit -> evaluate -> artifact.
//!
//! Any failure aborts before the artifact is written, so a previously
//! deployed artifact is never replaced by the output of a broken run.

use std::path::{Path, PathBuf};

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::{save_artifact, ArtifactSaveError};
use crate::constants::{
    DEFAULT_DATASET_FILENAME, DEFAULT_DATA_DIR, DEFAULT_MODEL_PATH, DEFAULT_RANDOM_STATE,
    DEFAULT_VALIDATION_FRACTION, QUALITY_COLUMN, UCI_RED_WINE_URL,
};
use crate::dataset::{
    download_red_wine_quality, load_dataset, stratified_split, Dataset, DatasetError,
};
use crate::eval::{evaluate, Evaluation, EvaluationError};
use crate::features::FeatureSchema;
use crate::label::{derive_labels, LabelThreshold};
use crate::model::{build_model, Classifier, DecisionThreshold, FitError};

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("model fit failed: {0}")]
    Fit(#[from] FitError),

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Artifact(#[from] ArtifactSaveError),
}

/// Everything the training entry point can be told
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub label_threshold: LabelThreshold,
    pub decision_threshold: DecisionThreshold,
    pub random_state: u64,
    pub validation_fraction: f64,
    pub features: FeatureSchema,
    pub dataset_url: String,
    pub data_dir: PathBuf,
    pub force_download: bool,
    pub output: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            label_threshold: LabelThreshold::default(),
            decision_threshold: DecisionThreshold::default(),
            random_state: DEFAULT_RANDOM_STATE,
            validation_fraction: DEFAULT_VALIDATION_FRACTION,
            features: FeatureSchema::wine(),
            dataset_url: UCI_RED_WINE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            force_download: false,
            output: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

/// What a successful run produced
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    pub artifact_path: PathBuf,
    pub train_rows: usize,
    pub validation_rows: usize,
    pub positive_rate: f64,
    pub train: Evaluation,
    pub validation: Evaluation,
}

/// Fetch (or reuse) the dataset, then train on it
pub fn run(config: &TrainConfig) -> Result<TrainingSummary, TrainingError> {
    let data_path = download_red_wine_quality(
        &config.dataset_url,
        &config.data_dir,
        DEFAULT_DATASET_FILENAME,
        config.force_download,
    )?;
    run_on_file(config, &data_path)
}

/// Train on a local CSV, skipping acquisition
pub fn run_on_file(
    config: &TrainConfig,
    data_path: &Path,
) -> Result<TrainingSummary, TrainingError> {
    let dataset = load_dataset(data_path)?;
    run_on_dataset(config, &dataset)
}

pub fn run_on_dataset(
    config: &TrainConfig,
    dataset: &Dataset,
) -> Result<TrainingSummary, TrainingError> {
    let (rows, cols) = dataset.shape();
    log::info!("Dataset shape: ({}, {})", rows, cols);

    // Binary label (training only)
    let quality = dataset.column(QUALITY_COLUMN)?;
    let y = derive_labels(&quality, config.label_threshold);
    let positives = y.iter().filter(|&&label| label == 1).count();
    let positive_rate = positives as f64 / y.len().max(1) as f64;
    log::info!(
        "Labels: {} good / {} total (quality >= {}, rate {:.3})",
        positives,
        y.len(),
        config.label_threshold.value(),
        positive_rate
    );

    let x = dataset.select(&config.features)?;

    let split = stratified_split(&y, config.validation_fraction, config.random_state)?;
    let (x_train, y_train) = take_rows(&x, &y, &split.train);
    let (x_val, y_val) = take_rows(&x, &y, &split.validation);
    log::info!("Split: {} train / {} validation rows", y_train.len(), y_val.len());

    let model = build_model().fit(x_train.view(), &y_train)?;

    let train = evaluate(&model, x_train.view(), &y_train, config.decision_threshold, true)?;
    log_evaluation("TRAIN", &train);

    let validation = evaluate(&model, x_val.view(), &y_val, config.decision_threshold, true)?;
    log_evaluation("VALIDATION", &validation);

    let artifact_path = save_artifact(
        &model,
        &config.features,
        config.decision_threshold,
        &config.output,
    )?;

    Ok(TrainingSummary {
        artifact_path,
        train_rows: y_train.len(),
        validation_rows: y_val.len(),
        positive_rate,
        train,
        validation,
    })
}

fn take_rows(x: &Array2<f64>, y: &[u8], indices: &[usize]) -> (Array2<f64>, Vec<u8>) {
    let labels = indices.iter().map(|&i| y[i]).collect();
    (x.select(Axis(0), indices), labels)
}

fn log_evaluation(name: &str, evaluation: &Evaluation) {
    let m = &evaluation.metrics;
    log::info!(
        "=== {} === roc_auc={:.4} accuracy={:.4} precision={:.4} recall={:.4} f1={:.4}",
        name,
        m.roc_auc,
        m.accuracy,
        m.precision,
        m.recall,
        m.f1
    );
    log::info!("{} confusion matrix: {:?}", name, evaluation.confusion_matrix.as_array());
    if let Some(report) = &evaluation.classification_report {
        log::info!("{} classification report:\n{}", name, report);
    }
}
