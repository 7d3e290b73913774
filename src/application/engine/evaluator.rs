//! Evaluator - scores one trainee turn and turns it into feedback.

use std::sync::Arc;
use std::time::Duration;

use super::with_deadline;
use crate::domain::training::{Evaluation, ScoringPolicy, Turn};
use crate::ports::{CapabilityError, TurnScorer};

/// Wraps the scoring capability with clamping, sentiment bands and
/// canned-tip backfill.
pub struct Evaluator {
    scorer: Arc<dyn TurnScorer>,
    policy: ScoringPolicy,
    timeout: Duration,
}

impl Evaluator {
    pub fn new(scorer: Arc<dyn TurnScorer>, policy: ScoringPolicy, timeout: Duration) -> Self {
        Self {
            scorer,
            policy,
            timeout,
        }
    }

    /// Scores `turn` given the transcript up to and including it.
    pub async fn evaluate(
        &self,
        transcript: &[Turn],
        turn: &Turn,
        labels: &[String],
    ) -> Result<Evaluation, CapabilityError> {
        let raw = with_deadline(self.timeout, self.scorer.score_turn(transcript, turn, labels)).await?;
        tracing::debug!(turn_id = %turn.id(), raw_score = raw.raw_score, "turn scored");
        Ok(self
            .policy
            .interpret(raw.raw_score, raw.tips, raw.dimension_scores, labels))
    }
}
