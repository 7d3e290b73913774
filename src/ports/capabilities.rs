//! Training capability ports.
//!
//! The session engine sequences turns and aggregates scores; producing
//! language and judging it is delegated to these three capabilities.
//! Each may fail or time out, which the engine reports as
//! `CapabilityUnavailable` without fabricating output.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use super::AIError;
use crate::domain::training::{GoalSpec, ReportScores, ScenarioConfig, TrainingError, Turn};

/// Raw scorer output before clamping and classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTurnScore {
    pub raw_score: f64,
    pub tips: Vec<String>,
    /// Optional per-dimension scores keyed by rubric label.
    pub dimension_scores: BTreeMap<String, f64>,
}

impl RawTurnScore {
    pub fn new(raw_score: f64) -> Self {
        Self {
            raw_score,
            ..Self::default()
        }
    }

    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.tips.push(tip.into());
        self
    }

    pub fn with_dimension(mut self, label: impl Into<String>, score: f64) -> Self {
        self.dimension_scores.insert(label.into(), score);
        self
    }
}

/// Produces the simulated counterpart's lines and the report narrative.
#[async_trait]
pub trait CounterpartGenerator: Send + Sync {
    /// Next counterpart reply given the transcript so far.
    async fn generate_counterpart_turn(
        &self,
        transcript: &[Turn],
        scenario: &ScenarioConfig,
    ) -> Result<String, CapabilityError>;

    /// Coaching summary for the end-of-session report.
    async fn generate_narrative(
        &self,
        transcript: &[Turn],
        scores: &ReportScores,
    ) -> Result<String, CapabilityError>;
}

/// Scores a single trainee turn.
#[async_trait]
pub trait TurnScorer: Send + Sync {
    async fn score_turn(
        &self,
        transcript: &[Turn],
        turn: &Turn,
        labels: &[String],
    ) -> Result<RawTurnScore, CapabilityError>;
}

/// Decides whether the trainee has reached a goal.
#[async_trait]
pub trait GoalClassifier: Send + Sync {
    async fn is_satisfied(&self, transcript: &[Turn], goal: &GoalSpec)
        -> Result<bool, CapabilityError>;
}

/// Capability failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapabilityError {
    #[error("capability unavailable: {0}")]
    Unavailable(String),

    #[error("capability timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid capability response: {0}")]
    InvalidResponse(String),
}

impl CapabilityError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        CapabilityError::Unavailable(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        CapabilityError::InvalidResponse(message.into())
    }
}

impl From<AIError> for CapabilityError {
    fn from(err: AIError) -> Self {
        match err {
            AIError::Parse(msg) => CapabilityError::InvalidResponse(msg),
            AIError::Timeout { timeout_secs } => {
                CapabilityError::Timeout(Duration::from_secs(u64::from(timeout_secs)))
            }
            other => CapabilityError::Unavailable(other.to_string()),
        }
    }
}

impl From<CapabilityError> for TrainingError {
    fn from(err: CapabilityError) -> Self {
        TrainingError::CapabilityUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_turn_score_builder() {
        let raw = RawTurnScore::new(88.0)
            .with_tip("Great job pivoting to the pain point (speed)")
            .with_dimension("Logic", 90.0);

        assert_eq!(raw.tips.len(), 1);
        assert_eq!(raw.dimension_scores.get("Logic"), Some(&90.0));
    }

    #[test]
    fn ai_errors_map_to_capability_errors() {
        assert_eq!(
            CapabilityError::from(AIError::parse("no json")),
            CapabilityError::InvalidResponse("no json".to_string())
        );
        assert_eq!(
            CapabilityError::from(AIError::Timeout { timeout_secs: 5 }),
            CapabilityError::Timeout(Duration::from_secs(5))
        );
        assert!(matches!(
            CapabilityError::from(AIError::AuthenticationFailed),
            CapabilityError::Unavailable(_)
        ));
    }

    #[test]
    fn capability_error_becomes_training_error() {
        let err: TrainingError = CapabilityError::unavailable("scorer down").into();
        assert_eq!(
            err,
            TrainingError::CapabilityUnavailable("capability unavailable: scorer down".to_string())
        );
    }
}
