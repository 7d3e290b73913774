//! HTTP adapters - REST API for the training dashboard.

pub mod training;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::engine::SessionRegistry;

pub use training::{training_routes, TrainingHandlers};

/// Full application router: `/health` plus the training API under `/api`.
pub fn app_router(registry: Arc<SessionRegistry>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .nest("/api", training_routes(TrainingHandlers::new(registry)))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
