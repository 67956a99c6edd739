use std::path::PathBuf;

use thiserror::Error;

use super::Artifact;
use crate::features::FeatureSchema;
use crate::model::FittedClassifier;

#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("cannot read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not JSON, a required field is missing, or a field failed its own checks
    #[error("malformed artifact {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Parsed, but the parts do not fit together
    #[error("incompatible artifact {path}: {reason}")]
    Incompatible { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum ArtifactSaveError {
    #[error("cannot write artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parts would produce an artifact that cannot be loaded back
    #[error("refusing to write artifact {path}: {reason}")]
    Incompatible { path: PathBuf, reason: String },

    #[error("cannot serialize artifact: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Cross-field checks on a parsed artifact
pub fn validate_artifact<M: FittedClassifier>(artifact: &Artifact<M>) -> Result<(), String> {
    let expected_hash = artifact.features.layout_hash();
    if artifact.layout_hash != expected_hash {
        return Err(format!(
            "feature layout hash mismatch: stored {:08x}, computed {:08x}",
            artifact.layout_hash, expected_hash
        ));
    }

    validate_parts(&artifact.model, &artifact.features)
}

/// Model state and model/schema width. Shared by save and load.
pub(crate) fn validate_parts<M>(model: &M, features: &FeatureSchema) -> Result<(), String>
where
    M: FittedClassifier + ?Sized,
{
    model.validate_state()?;

    if model.n_features() != features.len() {
        return Err(format!(
            "model expects {} features but schema lists {}",
            model.n_features(),
            features.len()
        ));
    }

    Ok(())
}
