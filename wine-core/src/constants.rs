//! Central Configuration Constants
//!
//! Single source of truth for training and serving defaults.
//! Every default can be overridden from the environment (see the helpers below)
//! or from the `wine-train` command line.

/// UCI red wine quality dataset (semicolon separated)
pub const UCI_RED_WINE_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/wine-quality/winequality-red.csv";

/// Local directory for the cached dataset
pub const DEFAULT_DATA_DIR: &str = "data";

/// File name of the cached dataset
pub const DEFAULT_DATASET_FILENAME: &str = "winequality-red.csv";

/// Artifact written by training and read by the server
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Column holding the raw quality score
pub const QUALITY_COLUMN: &str = "quality";

/// good_quality = (quality >= 7)
pub const DEFAULT_LABEL_THRESHOLD: f64 = 7.0;

/// Probability cut-off used at evaluation and in deployment
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.7;

/// Seed for the train/validation split
pub const DEFAULT_RANDOM_STATE: u64 = 42;

/// Share of rows held out for validation
pub const DEFAULT_VALIDATION_FRACTION: f64 = 0.30;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get artifact path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

