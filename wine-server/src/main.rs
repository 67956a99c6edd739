//! Wine Quality Inference Server
//!
//! Serves a trained wine quality artifact over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      WINE SERVER                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐        ┌──────────────────────────────────┐  │
//! │  │  Router   │──────▶ │  InferenceService (Arc, shared)  │  │
//! │  │  (Axum)   │        │  schema -> scaler -> logistic    │  │
//! │  └───────────┘        └────────────────┬─────────────────┘  │
//! │                                        ▼                    │
//! │                              ┌──────────────────┐           │
//! │                              │  model.json      │           │
//! │                              │  (loaded once)   │           │
//! │                              └──────────────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wine_core::InferenceService;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "wine_server=debug,tower_http=debug".into()),
    );
    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Wine Quality Server v{} starting...", wine_core::constants::APP_VERSION);
    tracing::info!("Model: {}", config.model_path.display());

    // Load the artifact before binding; a server without a model never listens
    let service = match InferenceService::load(&config.model_path) {
        Ok(service) => service,
        Err(err) => {
            tracing::error!("Failed to load model artifact: {}", err);
            return Err(err).context("model artifact could not be loaded");
        }
    };
    tracing::info!(
        "Loaded model: {} features, threshold {}",
        service.features().len(),
        service.threshold()
    );

    // Build application state
    let state = AppState {
        service: Arc::new(service),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InferenceService>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
