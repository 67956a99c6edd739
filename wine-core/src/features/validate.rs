//! Request validation against the feature schema.
//!
//! A request is a free-form mapping of feature name to value. Validation
//! projects it onto the schema: known features are taken in schema order,
//! unknown keys are dropped, and any gap fails the whole request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::layout::FeatureSchema;

/// Caller-supplied feature values, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionRequest(HashMap<String, Value>);

impl PredictionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and clients
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Numeric value of a feature. Absent keys, `null` and non-numeric
    /// values all read as `None`.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for PredictionRequest {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
    }
}

/// One or more schema features could not be read from the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required features: {missing:?}. Expected: {expected:?}")]
pub struct MissingFeaturesError {
    /// Missing names, in schema order
    pub missing: Vec<String>,
    /// The full schema, so the caller can fix the request in one round trip
    pub expected: Vec<String>,
}

impl FeatureSchema {
    /// Project a request onto this schema.
    ///
    /// Returns the values in schema order, or every missing feature at once.
    pub fn validate(&self, request: &PredictionRequest) -> Result<Vec<f64>, MissingFeaturesError> {
        let mut values = Vec::with_capacity(self.len());
        let mut missing = Vec::new();

        for name in self.names() {
            match request.value(name) {
                Some(v) => values.push(v),
                None => missing.push(name.clone()),
            }
        }

        if !missing.is_empty() {
            return Err(MissingFeaturesError {
                missing,
                expected: self.names().to_vec(),
            });
        }

        Ok(values)
    }
}
