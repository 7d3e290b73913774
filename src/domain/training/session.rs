//! TrainingSession aggregate.
//!
//! Owns the transcript, goal checklist and rubric for one roleplay session
//! and enforces the `Active -> Ended` lifecycle. All methods are
//! synchronous; the async capability calls happen outside and hand their
//! results back through [`StagedTurn`] so a turn is committed in one step.
//!
//! # Invariants
//!
//! - the transcript starts with a system briefing and an opening counterpart turn
//! - trainee turns are only accepted while `Active`
//! - a report is produced exactly once, when the session ends

use super::errors::TrainingError;
use super::goals::{Goal, GoalChecklist};
use super::report::{NarrativeSource, ReportScores, SessionReport};
use super::rubric::{Rubric, RubricDimension};
use super::scenario::ScenarioConfig;
use super::scoring::{Evaluation, ScoringPolicy};
use super::transcript::Transcript;
use super::turn::{Turn, TurnId};
use crate::domain::foundation::{
    GoalId, ScenarioId, SessionId, SessionStatus, StateMachine, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A trainee turn accepted into the transcript and awaiting evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTurn {
    pub turn: Turn,
    /// Transcript up to and including `turn`.
    pub transcript: Vec<Turn>,
    /// True if the turn was already pending from an earlier attempt.
    pub reused: bool,
}

/// Everything computed for a pending trainee turn, ready to commit.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedTurn {
    pub trainee_turn_id: TurnId,
    pub evaluation: Evaluation,
    pub completed_goals: Vec<GoalId>,
    pub counterpart_text: String,
}

/// Turns appended by a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedTurns {
    pub trainee: Turn,
    pub counterpart: Turn,
    pub completed_goals: Vec<GoalId>,
}

/// Read-only view of a session for the live sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub scenario_id: ScenarioId,
    pub scenario_title: String,
    pub status: SessionStatus,
    pub turns: Vec<Turn>,
    pub goals: Vec<Goal>,
    pub dimensions: Vec<RubricDimension>,
    pub started_at: Timestamp,
    pub elapsed_secs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<SessionReport>,
}

/// TrainingSession aggregate.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    id: SessionId,
    scenario: Arc<ScenarioConfig>,
    status: SessionStatus,
    transcript: Transcript,
    goals: GoalChecklist,
    rubric: Rubric,
    report: Option<SessionReport>,
    started_at: Timestamp,
    ended_at: Option<Timestamp>,
}

impl TrainingSession {
    /// Starts an active session for a validated scenario.
    ///
    /// # Errors
    ///
    /// - `ConfigInvalid` if the scenario fails validation
    pub fn start(id: SessionId, scenario: Arc<ScenarioConfig>) -> Result<Self, TrainingError> {
        scenario.validate()?;

        let mut transcript = Transcript::new();
        transcript.append_system(scenario.briefing_text.clone());
        transcript.append_counterpart(scenario.opening_counterpart_text.clone(), None);

        Ok(Self {
            id,
            goals: GoalChecklist::from_specs(&scenario.goals),
            rubric: Rubric::new(&scenario.rubric_dimension_labels),
            scenario,
            status: SessionStatus::Active,
            transcript,
            report: None,
            started_at: Timestamp::now(),
            ended_at: None,
        })
    }

    /// Discards all progress and starts over with the same id and scenario.
    ///
    /// Valid in either state.
    pub fn restart(&mut self) -> Result<(), TrainingError> {
        *self = Self::start(self.id, Arc::clone(&self.scenario))?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn scenario(&self) -> &Arc<ScenarioConfig> {
        &self.scenario
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn goals(&self) -> &GoalChecklist {
        &self.goals
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// Cached report, present once the session has ended.
    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    pub fn is_ended(&self) -> bool {
        self.status == SessionStatus::Ended
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Turn taking
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a trainee turn, or reuses the pending one if the text matches.
    ///
    /// A trainee turn left unanswered by a failed submission can only be
    /// retried verbatim; the transcript never holds two trainee turns in a row.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the session has ended, or a different text
    ///   arrives while a trainee turn is still awaiting a reply
    /// - `EmptyInput` if `text` is blank
    pub fn accept_trainee_turn(&mut self, text: &str) -> Result<PendingTurn, TrainingError> {
        self.ensure_active()?;

        let text = text.trim();
        if text.is_empty() {
            return Err(TrainingError::EmptyInput);
        }

        let (turn, reused) = match self.transcript.pending_trainee_turn() {
            Some(pending) if pending.text() == text => (pending.clone(), true),
            Some(pending) => {
                return Err(TrainingError::invalid_state(format!(
                    "turn {} is still awaiting a reply; resend the same text to retry",
                    pending.id()
                )))
            }
            None => (self.transcript.append_trainee(text).clone(), false),
        };

        Ok(PendingTurn {
            transcript: self.transcript.prefix_through(turn.id()).to_vec(),
            turn,
            reused,
        })
    }

    /// Commits a fully computed turn: rubric rollup, goal flips and the
    /// counterpart reply carrying the feedback.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the session ended or the trainee turn is no
    ///   longer the pending one
    pub fn commit_turn(
        &mut self,
        staged: StagedTurn,
        policy: &ScoringPolicy,
    ) -> Result<SubmittedTurns, TrainingError> {
        self.ensure_active()?;

        let trainee = match self.transcript.pending_trainee_turn() {
            Some(turn) if turn.id() == staged.trainee_turn_id => turn.clone(),
            _ => {
                return Err(TrainingError::invalid_state(format!(
                    "turn {} is no longer awaiting a reply",
                    staged.trainee_turn_id
                )))
            }
        };

        self.rubric.fold(&staged.evaluation, policy);
        let completed_goals: Vec<GoalId> = staged
            .completed_goals
            .into_iter()
            .filter(|id| self.goals.mark_done(id))
            .collect();
        let counterpart = self
            .transcript
            .append_counterpart(staged.counterpart_text, Some(staged.evaluation.feedback))
            .clone();

        Ok(SubmittedTurns {
            trainee,
            counterpart,
            completed_goals,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ending
    // ─────────────────────────────────────────────────────────────────────────

    /// Final scores as they stand now.
    pub fn final_scores(&self) -> ReportScores {
        ReportScores::aggregate(&self.scenario, &self.rubric, &self.goals)
    }

    /// Ends the session with the given narrative and caches the report.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the session already ended
    pub fn close(
        &mut self,
        scores: ReportScores,
        narrative: String,
        source: NarrativeSource,
    ) -> Result<SessionReport, TrainingError> {
        let next = self
            .status
            .transition_to(SessionStatus::Ended)
            .map_err(|e| TrainingError::invalid_state(e.to_string()))?;

        let report = SessionReport::new(
            self.id,
            self.scenario.scenario_id.clone(),
            scores,
            narrative,
            source,
        );
        self.status = next;
        self.ended_at = Some(Timestamp::now());
        self.report = Some(report.clone());
        Ok(report)
    }

    /// Builds a serializable view of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let until = self.ended_at.unwrap_or_else(Timestamp::now);
        SessionSnapshot {
            session_id: self.id,
            scenario_id: self.scenario.scenario_id.clone(),
            scenario_title: self.scenario.title.clone(),
            status: self.status,
            turns: self.transcript.turns().to_vec(),
            goals: self.goals.goals().to_vec(),
            dimensions: self.rubric.dimensions().to_vec(),
            started_at: self.started_at,
            elapsed_secs: until.duration_since(&self.started_at).num_seconds(),
            report: self.report.clone(),
        }
    }

    fn ensure_active(&self) -> Result<(), TrainingError> {
        if self.status.accepts_turns() {
            Ok(())
        } else {
            Err(TrainingError::invalid_state(format!(
                "session {} has ended",
                self.id
            )))
        }
    }
}
