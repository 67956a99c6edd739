//! Cached download of the raw dataset.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::parse::{parse_dataset, to_csv};
use super::DatasetError;

/// Return the cached CSV under `data_dir`, fetching it first if absent
/// (or when `force_download` is set).
///
/// The fetched table is validated and stored comma-separated. The cache file
/// appears atomically, so an interrupted download never leaves a partial file.
pub fn download_red_wine_quality(
    url: &str,
    data_dir: &Path,
    filename: &str,
    force_download: bool,
) -> Result<PathBuf, DatasetError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| DatasetError::Io { path, source }
    };

    fs::create_dir_all(data_dir).map_err(io_err(data_dir))?;
    let local_path = data_dir.join(filename);

    if local_path.exists() && !force_download {
        log::debug!("Using cached dataset at {}", local_path.display());
        return Ok(local_path);
    }

    log::info!("Downloading dataset from {}", url);
    let body = fetch(url)?;
    let dataset = parse_dataset(&body)?;

    let mut tmp = NamedTempFile::new_in(data_dir).map_err(io_err(data_dir))?;
    tmp.write_all(to_csv(&dataset).as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(io_err(tmp.path()))?;
    tmp.persist(&local_path)
        .map_err(|e| DatasetError::Io {
            path: local_path.clone(),
            source: e.error,
        })?;

    log::info!("Saved dataset to {} ({} rows)", local_path.display(), dataset.n_rows());
    Ok(local_path)
}

fn fetch(url: &str) -> Result<String, DatasetError> {
    let download_err = |message: String| DatasetError::Download {
        url: url.to_string(),
        message,
    };

    let response = ureq::get(url).call().map_err(|e| download_err(e.to_string()))?;
    response.into_string().map_err(|e| download_err(e.to_string()))
}
