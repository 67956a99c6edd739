use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::validate::{validate_artifact, validate_parts, ArtifactLoadError, ArtifactSaveError};
use super::Artifact;
use crate::features::FeatureSchema;
use crate::model::{DecisionThreshold, FittedClassifier};

/// Borrowed view with the same layout as [`Artifact`], so saving does not
/// need to take ownership of the model.
#[derive(Serialize)]
struct ArtifactRef<'a, M> {
    model: &'a M,
    features: &'a FeatureSchema,
    threshold: DecisionThreshold,
    layout_hash: u32,
}

/// Persist {model, features, threshold} to `path`.
///
/// The parts are checked first with the same rules [`load_artifact`] applies,
/// so an existing artifact is never replaced by one that cannot be loaded.
/// Writes to a temporary file in the same directory, syncs it and renames it
/// over `path`, so readers see either the old artifact or the new one.
pub fn save_artifact<M>(
    model: &M,
    features: &FeatureSchema,
    threshold: DecisionThreshold,
    path: &Path,
) -> Result<PathBuf, ArtifactSaveError>
where
    M: Serialize + FittedClassifier,
{
    validate_parts(model, features).map_err(|reason| ArtifactSaveError::Incompatible {
        path: path.to_path_buf(),
        reason,
    })?;

    let view = ArtifactRef {
        model,
        features,
        threshold,
        layout_hash: features.layout_hash(),
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_err = |source: io::Error| ArtifactSaveError::Io {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_err)?;
    let tmp = NamedTempFile::new_in(dir).map_err(io_err)?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, &view)?;
        writer.flush().map_err(io_err)?;
    }
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    log::info!(
        "Saved artifact to {} ({} features, threshold {})",
        path.display(),
        features.len(),
        threshold
    );
    Ok(path.to_path_buf())
}

impl<M: Serialize + FittedClassifier> Artifact<M> {
    pub fn save(&self, path: &Path) -> Result<PathBuf, ArtifactSaveError> {
        save_artifact(&self.model, &self.features, self.threshold, path)
    }
}

/// Read and validate an artifact
pub fn load_artifact<M>(path: &Path) -> Result<Artifact<M>, ArtifactLoadError>
where
    M: DeserializeOwned + FittedClassifier,
{
    let data = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ArtifactLoadError::NotFound(path.to_path_buf())
        } else {
            ArtifactLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let artifact: Artifact<M> =
        serde_json::from_slice(&data).map_err(|source| ArtifactLoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    validate_artifact(&artifact).map_err(|reason| ArtifactLoadError::Incompatible {
        path: path.to_path_buf(),
        reason,
    })?;

    log::info!(
        "Loaded artifact {} ({} features, threshold {})",
        path.display(),
        artifact.features.len(),
        artifact.threshold
    );
    Ok(artifact)
}
