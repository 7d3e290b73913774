//! Training-specific error types.

use super::scenario::ScenarioError;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use thiserror::Error;

/// Errors raised by training session operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    /// Operation not allowed in the session's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Submitted text was empty after trimming.
    #[error("Turn text must not be empty")]
    EmptyInput,

    /// Another submission is already in flight for this session.
    #[error("Session {0} is already processing a turn")]
    SessionBusy(SessionId),

    /// An external capability failed or timed out.
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Scenario or engine configuration is invalid.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),
}

impl TrainingError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        TrainingError::InvalidState(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TrainingError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            TrainingError::EmptyInput => ErrorCode::EmptyInput,
            TrainingError::SessionBusy(_) => ErrorCode::SessionBusy,
            TrainingError::CapabilityUnavailable(_) => ErrorCode::CapabilityUnavailable,
            TrainingError::ConfigInvalid(_) => ErrorCode::ConfigInvalid,
            TrainingError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            TrainingError::ScenarioNotFound(_) => ErrorCode::ScenarioNotFound,
        }
    }

    /// Returns true if the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TrainingError::SessionBusy(_) | TrainingError::CapabilityUnavailable(_)
        )
    }
}

impl From<ScenarioError> for TrainingError {
    fn from(err: ScenarioError) -> Self {
        TrainingError::ConfigInvalid(err.to_string())
    }
}

impl From<TrainingError> for DomainError {
    fn from(err: TrainingError) -> Self {
        let domain = DomainError::new(err.code(), err.to_string());
        match &err {
            TrainingError::SessionBusy(id) | TrainingError::SessionNotFound(id) => {
                domain.with_detail("session_id", id.to_string())
            }
            TrainingError::ScenarioNotFound(id) => domain.with_detail("scenario_id", id.clone()),
            _ => domain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_variants() {
        assert_eq!(TrainingError::EmptyInput.code(), ErrorCode::EmptyInput);
        assert_eq!(
            TrainingError::invalid_state("ended").code(),
            ErrorCode::InvalidStateTransition
        );
        assert_eq!(
            TrainingError::SessionBusy(SessionId::new()).code(),
            ErrorCode::SessionBusy
        );
    }

    #[test]
    fn only_busy_and_capability_errors_are_retryable() {
        assert!(TrainingError::SessionBusy(SessionId::new()).is_retryable());
        assert!(TrainingError::CapabilityUnavailable("timeout".to_string()).is_retryable());
        assert!(!TrainingError::EmptyInput.is_retryable());
        assert!(!TrainingError::invalid_state("ended").is_retryable());
    }

    #[test]
    fn scenario_error_becomes_config_invalid() {
        let err: TrainingError = ScenarioError::NoGoals.into();
        assert_eq!(
            err,
            TrainingError::ConfigInvalid("scenario must define at least one goal".to_string())
        );
    }

    #[test]
    fn domain_error_carries_session_detail() {
        let id = SessionId::new();
        let domain: DomainError = TrainingError::SessionNotFound(id).into();
        assert_eq!(domain.code, ErrorCode::SessionNotFound);
        assert_eq!(domain.details.get("session_id"), Some(&id.to_string()));
    }
}
