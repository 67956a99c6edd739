//! Wine quality trainer.
//!
//! Downloads (or reuses) the UCI red wine dataset, fits the classifier,
//! reports train/validation metrics and writes the artifact for the server.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use wine_core::constants::{
    APP_VERSION, DEFAULT_DATA_DIR, DEFAULT_DECISION_THRESHOLD, DEFAULT_LABEL_THRESHOLD,
    DEFAULT_MODEL_PATH, DEFAULT_RANDOM_STATE, DEFAULT_VALIDATION_FRACTION, UCI_RED_WINE_URL,
};
use wine_core::{train, DecisionThreshold, LabelThreshold, TrainConfig};

#[derive(Parser)]
#[command(name = "wine-train")]
#[command(author, version, about = "Train the wine quality classifier and write its artifact")]
struct Args {
    /// Quality score at or above which a wine is labeled good
    #[arg(long, env = "WINE_LABEL_THRESHOLD", default_value_t = DEFAULT_LABEL_THRESHOLD)]
    label_threshold: f64,

    /// Probability cut-off stored in the artifact and used for serving
    #[arg(long, env = "WINE_DECISION_THRESHOLD", default_value_t = DEFAULT_DECISION_THRESHOLD)]
    decision_threshold: f64,

    /// Seed for the stratified train/validation split
    #[arg(long, env = "WINE_RANDOM_STATE", default_value_t = DEFAULT_RANDOM_STATE)]
    random_state: u64,

    /// Share of rows held out for validation
    #[arg(long, env = "WINE_VALIDATION_FRACTION", default_value_t = DEFAULT_VALIDATION_FRACTION)]
    validation_fraction: f64,

    /// Directory holding the cached dataset
    #[arg(long, env = "WINE_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Dataset source URL
    #[arg(long, env = "WINE_DATASET_URL", default_value = UCI_RED_WINE_URL)]
    dataset_url: String,

    /// Train on this local CSV instead of the cached download
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Re-download even if a cached copy exists
    #[arg(long)]
    force_download: bool,

    /// Artifact output path
    #[arg(short, long, env = "WINE_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("wine-train v{}", APP_VERSION);

    let config = TrainConfig {
        label_threshold: LabelThreshold::new(args.label_threshold),
        decision_threshold: DecisionThreshold::new(args.decision_threshold)
            .context("invalid --decision-threshold")?,
        random_state: args.random_state,
        validation_fraction: args.validation_fraction,
        dataset_url: args.dataset_url,
        data_dir: args.data_dir,
        force_download: args.force_download,
        output: args.output,
        ..TrainConfig::default()
    };

    let summary = match &args.data_file {
        Some(path) => train::run_on_file(&config, path),
        None => train::run(&config),
    }
    .context("training failed; no artifact was written")?;

    log::info!(
        "Saved model artifact to: {} ({} train / {} validation rows, validation roc_auc {:.4})",
        summary.artifact_path.display(),
        summary.train_rows,
        summary.validation_rows,
        summary.validation.metrics.roc_auc
    );

    Ok(())
}
