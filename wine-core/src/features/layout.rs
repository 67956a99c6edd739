//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The schema a model was trained with travels inside the artifact. Every
//! inference request is projected onto that exact ordered list, never onto a
//! list rebuilt at serving time.
//!
//! ## Rules (NEVER break these):
//! 1. Feature order is the column order of the model input
//! 2. Names are unique
//! 3. A schema is never mutated after construction

use std::fmt;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Wine features in exact order they appear in the model input.
/// Names are the lowercased UCI column headers.
pub const WINE_FEATURES: &[&str] = &[
    "fixed acidity",        // 0: Tartaric acid (g/dm³)
    "volatile acidity",     // 1: Acetic acid (g/dm³)
    "citric acid",          // 2
    "residual sugar",       // 3
    "chlorides",            // 4: Sodium chloride (g/dm³)
    "free sulfur dioxide",  // 5: mg/dm³
    "total sulfur dioxide", // 6: mg/dm³
    "density",              // 7: g/cm³
    "ph",                   // 8
    "sulphates",            // 9: Potassium sulphate (g/dm³)
    "alcohol",              // 10: % vol
];

/// Number of wine features
pub const WINE_FEATURE_COUNT: usize = 11;

// ============================================================================
// SCHEMA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("feature schema is empty")]
    Empty,

    #[error("duplicate feature name in schema: {0:?}")]
    Duplicate(String),
}

/// Ordered, de-duplicated list of feature names.
///
/// Serialized as a plain JSON array of strings. Deserialization goes through
/// [`FeatureSchema::new`], so a schema read from disk is held to the same rules
/// as one built in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }

        Ok(Self { names })
    }

    /// The red wine schema used by the training entry point
    pub fn wine() -> Self {
        Self {
            names: WINE_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True only for a schema with no names, which `new` never builds
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Compute CRC32 hash of the ordered names.
    /// Used to detect a tampered or mismatched artifact at load time.
    pub fn layout_hash(&self) -> u32 {
        let mut hasher = Hasher::new();

        for name in &self.names {
            hasher.update(name.as_bytes());
            hasher.update(&[0]); // Separator
        }

        hasher.finalize()
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.names
    }
}

impl fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names.join(", "))
    }
}

// ============================================================================
// TESTS
// ============================================================================
