//! HTTP routes for training endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    delete_session, end_session, get_session, list_scenarios, reset_session, start_session, submit_turn,
    TrainingHandlers,
};

/// Training router, meant to be nested under `/api`.
pub fn training_routes(handlers: TrainingHandlers) -> Router {
    Router::new()
        .route("/scenarios", get(list_scenarios))
        .route("/sessions", post(start_session))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/turns", post(submit_turn))
        .route("/sessions/:id/end", post(end_session))
        .route("/sessions/:id/reset", post(reset_session))
        .with_state(handlers)
}
