use super::{FeatureSchema, MissingFeaturesError, PredictionRequest, WINE_FEATURES};
use serde_json::json;

fn full_wine_request() -> PredictionRequest {
    serde_json::from_value(json!({
        "fixed acidity": 7.4,
        "volatile acidity": 0.7,
        "citric acid": 0.0,
        "residual sugar": 1.9,
        "chlorides": 0.076,
        "free sulfur dioxide": 11,
        "total sulfur dioxide": 34,
        "density": 0.9978,
        "ph": 3.51,
        "sulphates": 0.56,
        "alcohol": 9.4
    }))
    .unwrap()
}

#[test]
fn test_validate_returns_schema_order() {
    let schema = FeatureSchema::new(["b", "a", "c"]).unwrap();
    let request = PredictionRequest::new()
        .with("a", 1.0)
        .with("c", 3.0)
        .with("b", 2.0);

    assert_eq!(schema.validate(&request).unwrap(), vec![2.0, 1.0, 3.0]);
}

#[test]
fn test_validate_full_wine_request() {
    let values = FeatureSchema::wine().validate(&full_wine_request()).unwrap();

    assert_eq!(values.len(), WINE_FEATURES.len());
    assert_eq!(values[0], 7.4);
    assert_eq!(values[5], 11.0); // integers are accepted
    assert_eq!(values[10], 9.4);
}

#[test]
fn test_extra_keys_are_ignored() {
    let schema = FeatureSchema::new(["a"]).unwrap();
    let request = PredictionRequest::new()
        .with("a", 1.5)
        .with("color", "red")
        .with("vintage", 2019);

    assert_eq!(schema.validate(&request).unwrap(), vec![1.5]);
}

#[test]
fn test_all_missing_features_are_reported() {
    let schema = FeatureSchema::new(["a", "b", "c", "d"]).unwrap();
    let request = PredictionRequest::new().with("b", 1.0);

    let err = schema.validate(&request).unwrap_err();
    assert_eq!(
        err,
        MissingFeaturesError {
            missing: vec!["a".into(), "c".into(), "d".into()],
            expected: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        }
    );
}

#[test]
fn test_null_and_non_numeric_count_as_missing() {
    let schema = FeatureSchema::new(["a", "b", "c"]).unwrap();
    let request: PredictionRequest =
        serde_json::from_value(json!({ "a": null, "b": "7.1", "c": 3 })).unwrap();

    let err = schema.validate(&request).unwrap_err();
    assert_eq!(err.missing, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_wrong_key_misses_whole_wine_schema() {
    let request = PredictionRequest::new().with("fixed_acidity", 7.4);

    let err = FeatureSchema::wine().validate(&request).unwrap_err();
    assert_eq!(err.missing.len(), WINE_FEATURES.len());
    assert_eq!(err.expected, err.missing);
}

#[test]
fn test_single_missing_feature() {
    let request = full_wine_request().with("alcohol", serde_json::Value::Null);

    let err = FeatureSchema::wine().validate(&request).unwrap_err();
    assert_eq!(err.missing, vec!["alcohol".to_string()]);
    assert!(err.to_string().contains("alcohol"));
}
