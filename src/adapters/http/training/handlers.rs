//! HTTP handlers for training endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::engine::SessionRegistry;
use crate::application::handlers::training::{
    DeleteSessionCommand, DeleteSessionHandler, EndSessionCommand, EndSessionHandler, GetSessionHandler, GetSessionQuery,
    ListScenariosHandler, ResetSessionCommand, ResetSessionHandler, StartSessionCommand,
    StartSessionHandler, SubmitTurnCommand, SubmitTurnHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode, ScenarioId, SessionId};

use super::dto::{ErrorResponse, ScenarioListResponse, StartSessionRequest, SubmitTurnRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct TrainingHandlers {
    start_handler: Arc<StartSessionHandler>,
    submit_handler: Arc<SubmitTurnHandler>,
    end_handler: Arc<EndSessionHandler>,
    reset_handler: Arc<ResetSessionHandler>,
    get_handler: Arc<GetSessionHandler>,
    delete_handler: Arc<DeleteSessionHandler>,
    list_handler: Arc<ListScenariosHandler>,
}

impl TrainingHandlers {
    /// Wires every handler to one session registry.
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            list_handler: Arc::new(ListScenariosHandler::new(Arc::clone(registry.catalog()))),
            start_handler: Arc::new(StartSessionHandler::new(Arc::clone(&registry))),
            submit_handler: Arc::new(SubmitTurnHandler::new(Arc::clone(&registry))),
            end_handler: Arc::new(EndSessionHandler::new(Arc::clone(&registry))),
            reset_handler: Arc::new(ResetSessionHandler::new(Arc::clone(&registry))),
            delete_handler: Arc::new(DeleteSessionHandler::new(Arc::clone(&registry))),
            get_handler: Arc::new(GetSessionHandler::new(registry)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/scenarios
pub async fn list_scenarios(State(handlers): State<TrainingHandlers>) -> Response {
    let response: ScenarioListResponse = handlers.list_handler.handle().into();
    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/sessions
pub async fn start_session(
    State(handlers): State<TrainingHandlers>,
    Json(req): Json<StartSessionRequest>,
) -> Response {
    let scenario_id = match ScenarioId::new(req.scenario_id) {
        Ok(id) => id,
        Err(e) => return error_response(DomainError::from(e)),
    };

    match handlers
        .start_handler
        .handle(StartSessionCommand { scenario_id })
        .await
    {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(handlers): State<TrainingHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(GetSessionQuery { session_id }).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(handlers): State<TrainingHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .delete_handler
        .handle(DeleteSessionCommand { session_id })
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST /api/sessions/:id/turns
pub async fn submit_turn(
    State(handlers): State<TrainingHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<SubmitTurnRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = SubmitTurnCommand {
        session_id,
        text: req.text,
    };
    match handlers.submit_handler.handle(cmd).await {
        Ok(turns) => (StatusCode::OK, Json(turns)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST /api/sessions/:id/end
pub async fn end_session(
    State(handlers): State<TrainingHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.end_handler.handle(EndSessionCommand { session_id }).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST /api/sessions/:id/reset
pub async fn reset_session(
    State(handlers): State<TrainingHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .reset_handler
        .handle(ResetSessionCommand { session_id })
        .await
    {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response()
    })
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::EmptyInput | ErrorCode::ConfigInvalid => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::SessionNotFound | ErrorCode::ScenarioNotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidStateTransition | ErrorCode::SessionBusy => StatusCode::CONFLICT,
        ErrorCode::CapabilityUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: DomainError) -> Response {
    let status = status_for(error.code);
    if status.is_server_error() {
        tracing::warn!(code = %error.code, "Training request failed: {}", error.message);
    }
    (status, Json(ErrorResponse::from(error))).into_response()
}
