use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wine_core::model::{LogisticModel, StandardScaler};
use wine_core::{
    save_artifact, Artifact, DecisionThreshold, FeatureSchema, FittedPipeline, HealthStatus,
    InferenceService, PredictionResponse,
};

use crate::{create_router, AppState};

/// p = sigmoid(alcohol - 10) over the wine schema
fn alcohol_model() -> FittedPipeline {
    let n = FeatureSchema::wine().len();
    let mut coef = vec![0.0; n];
    coef[n - 1] = 1.0;
    FittedPipeline {
        scaler: StandardScaler {
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        },
        classifier: LogisticModel {
            coef,
            intercept: -10.0,
        },
    }
}

fn app_with(model: FittedPipeline) -> Router {
    let artifact = Artifact::new(model, FeatureSchema::wine(), DecisionThreshold::default());
    let service = InferenceService::from_artifact(artifact, "model.json");
    create_router(AppState {
        service: Arc::new(service),
    })
}

fn app() -> Router {
    app_with(alcohol_model())
}

fn wine(alcohol: f64) -> Value {
    json!({
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
        "alcohol": alcohol
    })
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_reports_loaded_artifact() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthStatus = serde_json::from_value(body).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.model_path, "model.json");
    assert_eq!(health.threshold, 0.7);
    assert_eq!(health.n_features, 11);
}

#[tokio::test]
async fn test_predict_not_good() {
    let (status, body) = send(app(), post_json(wine(9.4).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let resp: PredictionResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.good_quality, 0);
    assert!(resp.probability < 0.7);
    assert_eq!(resp.threshold, 0.7);
}

#[tokio::test]
async fn test_predict_good() {
    let (status, body) = send(app(), post_json(wine(12.5).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let resp: PredictionResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.good_quality, 1);
    assert!(resp.probability >= 0.7 && resp.probability <= 1.0);
}

#[tokio::test]
async fn test_predict_ignores_unknown_keys() {
    let mut body = wine(12.5);
    body["vintage"] = json!(2019);
    body["region"] = json!("Douro");

    let (status, with_extra) = send(app(), post_json(body.to_string())).await;
    let (_, plain) = send(app(), post_json(wine(12.5).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(with_extra, plain);
}

#[tokio::test]
async fn test_predict_wrong_key_lists_every_feature() {
    let request = post_json(json!({ "fixed_acidity": 7.4 }).to_string());
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "MissingFeatures");
    assert_eq!(body["status"], 422);

    let expected: Vec<String> = FeatureSchema::wine().names().to_vec();
    assert_eq!(body["missing"], json!(expected));
    assert_eq!(body["expected"], json!(expected));
    assert!(body["message"].as_str().unwrap().contains("Missing required features"));
}

#[tokio::test]
async fn test_predict_single_missing_feature() {
    let mut body = wine(10.0);
    body.as_object_mut().unwrap().remove("sulphates");
    body["alcohol"] = Value::Null;

    let (status, body) = send(app(), post_json(body.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["missing"], json!(["sulphates", "alcohol"]));
}

#[tokio::test]
async fn test_predict_overflowing_values_get_422() {
    // Halving the scale turns 1e308 into inf, and 0 * inf poisons the logit
    let mut model = alcohol_model();
    model.scaler.scale = vec![0.5; model.scaler.scale.len()];

    let mut body = wine(1e308);
    for value in body.as_object_mut().unwrap().values_mut() {
        *value = json!(1e308);
    }

    let (status, body) = send(app_with(model), post_json(body.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "NonFiniteScore");
    assert_eq!(body["status"], 422);
    assert!(body.get("probability").is_none());
}

#[tokio::test]
async fn test_predict_rejects_non_object_body() {
    let (status, body) = send(app(), post_json("[1, 2, 3]")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");

    let (status, _) = send(app(), post_json("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_serves_artifact_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let threshold = DecisionThreshold::new(0.5).unwrap();
    save_artifact(&alcohol_model(), &FeatureSchema::wine(), threshold, &path).unwrap();

    let service: InferenceService = InferenceService::load(&path).unwrap();
    let app = create_router(AppState {
        service: Arc::new(service),
    });

    let health_request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (_, health) = send(app.clone(), health_request).await;
    assert_eq!(health["threshold"], 0.5);
    assert_eq!(health["model_path"], path.display().to_string());

    // sigmoid(0) sits on the threshold and counts as good
    let (status, body) = send(app, post_json(wine(10.0).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["probability"], 0.5);
    assert_eq!(body["good_quality"], 1);
}
