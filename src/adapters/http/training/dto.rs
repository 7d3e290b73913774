//! Request and response bodies for training endpoints.
//!
//! Snapshots, turns and reports are serialized directly from the domain
//! types; only inputs and errors need their own shapes.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::training::ScenarioSummary;

/// POST /api/sessions
#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionRequest {
    pub scenario_id: String,
}

/// POST /api/sessions/:id/turns
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTurnRequest {
    pub text: String,
}

/// GET /api/scenarios
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioListResponse {
    pub scenarios: Vec<ScenarioSummary>,
    pub total: usize,
}

impl From<Vec<ScenarioSummary>> for ScenarioListResponse {
    fn from(scenarios: Vec<ScenarioSummary>) -> Self {
        Self {
            total: scenarios.len(),
            scenarios,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed.to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        let details = if err.details.is_empty() {
            None
        } else {
            serde_json::to_value(&err.details).ok()
        };
        Self {
            code: err.code.to_string(),
            message: err.message,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::training::TrainingError;

    #[test]
    fn error_response_carries_code_and_details() {
        let id = SessionId::new();
        let response = ErrorResponse::from(DomainError::from(TrainingError::SessionBusy(id)));

        assert_eq!(response.code, "SESSION_BUSY");
        let details = response.details.unwrap();
        assert_eq!(details["session_id"], id.to_string());
    }

    #[test]
    fn error_without_details_omits_field() {
        let response = ErrorResponse::from(DomainError::from(TrainingError::EmptyInput));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("details").is_none());
        assert_eq!(json["code"], "EMPTY_INPUT");
    }

    #[test]
    fn submit_turn_request_parses() {
        let req: SubmitTurnRequest = serde_json::from_str(r#"{"text": "Hello"}"#).unwrap();
        assert_eq!(req.text, "Hello");
    }
}
