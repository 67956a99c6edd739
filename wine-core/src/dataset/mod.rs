//! Dataset Module - Training data acquisition
//!
//! Downloads and caches the UCI red wine table, parses it into named numeric
//! columns, and splits rows into stratified train/validation sets.

pub mod download;
pub mod parse;
pub mod split;


use std::path::PathBuf;

use ndarray::Array2;
use thiserror::Error;

use crate::features::FeatureSchema;

pub use download::download_red_wine_quality;
pub use parse::{load_dataset, parse_dataset};
pub use split::{stratified_split, Split};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("download of {url} failed: {message}")]
    Download { url: String, message: String },

    #[error("dataset is empty")]
    Empty,

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("dataset is missing columns {missing:?}")]
    MissingColumns { missing: Vec<String> },

    #[error("validation fraction must be in (0, 1), got {0}")]
    InvalidFraction(f64),

    #[error("cannot split {rows} rows into non-empty train and validation sets")]
    TooSmall { rows: usize },
}

/// Numeric table with named columns, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Dataset {
    /// Every row must have one value per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, DatasetError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DatasetError::Parse {
                    line: i + 2,
                    message: format!("expected {} values, found {}", columns.len(), row.len()),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// One column by name
    pub fn column(&self, name: &str) -> Result<Vec<f64>, DatasetError> {
        let idx = self.column_index(name).ok_or_else(|| DatasetError::MissingColumns {
            missing: vec![name.to_string()],
        })?;
        Ok(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Feature matrix in schema order. Extra columns are ignored;
    /// every missing column is reported.
    pub fn select(&self, schema: &FeatureSchema) -> Result<Array2<f64>, DatasetError> {
        let mut indices = Vec::with_capacity(schema.len());
        let mut missing = Vec::new();
        for name in schema.names() {
            match self.column_index(name) {
                Some(i) => indices.push(i),
                None => missing.push(name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns { missing });
        }

        Ok(Array2::from_shape_fn((self.rows.len(), indices.len()), |(r, c)| {
            self.rows[r][indices[c]]
        }))
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}
