//! Features Module - Feature Schema and Request Validation
//!
//! The schema is the contract between training and serving: the same ordered
//! list builds the training matrix and validates every inference request.

pub mod layout;
pub mod validate;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{FeatureSchema, SchemaError, WINE_FEATURES, WINE_FEATURE_COUNT};
pub use validate::{MissingFeaturesError, PredictionRequest};
