//! SessionEngine - turn orchestration for one training session.
//!
//! # Concurrency
//!
//! The engine owns its [`TrainingSession`] behind a `tokio::sync::Mutex`.
//! Mutating operations take the lock with `try_lock` and fail with
//! `SessionBusy` rather than queueing. The guard is held across the
//! capability calls, so a submission is never interleaved with another.
//!
//! # Cancellation
//!
//! `submit_turn` appends the trainee turn first, then computes evaluation,
//! goal checks and the counterpart reply without touching the session. The
//! staged result is committed synchronously at the end. Dropping the future
//! at any await point therefore leaves just the trainee turn, which a retry
//! with the same text picks up again.
//!
//! # Activity
//!
//! Every operation stamps the engine as active. The registry uses
//! [`SessionEngine::idle_for`] to evict sessions nobody has touched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::{with_deadline, Evaluator, GoalTracker, ReportBuilder};
use crate::domain::foundation::SessionId;
use crate::domain::training::{
    ScenarioConfig, ScoringPolicy, SessionReport, SessionSnapshot, StagedTurn, SubmittedTurns,
    TrainingError, TrainingSession, Turn,
};
use crate::ports::{CapabilityError, CounterpartGenerator, GoalClassifier, TurnScorer};

/// Default bound on a single capability call.
pub const DEFAULT_CAPABILITY_TIMEOUT: Duration = Duration::from_secs(30);

/// The external capabilities a session depends on.
#[derive(Clone)]
pub struct Capabilities {
    pub counterpart: Arc<dyn CounterpartGenerator>,
    pub scorer: Arc<dyn TurnScorer>,
    pub goal_classifier: Arc<dyn GoalClassifier>,
}

/// Tunables shared by every session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub policy: ScoringPolicy,
    pub capability_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            policy: ScoringPolicy::default(),
            capability_timeout: DEFAULT_CAPABILITY_TIMEOUT,
        }
    }
}

pub struct SessionEngine {
    id: SessionId,
    session: Mutex<TrainingSession>,
    evaluator: Evaluator,
    goal_tracker: GoalTracker,
    report_builder: ReportBuilder,
    counterpart: Arc<dyn CounterpartGenerator>,
    settings: EngineSettings,
    created: Instant,
    /// Milliseconds after `created` of the last operation.
    last_active_ms: AtomicU64,
}

impl SessionEngine {
    /// Starts a new session for `scenario`.
    ///
    /// # Errors
    ///
    /// - `ConfigInvalid` if the scenario fails validation
    pub fn start(
        scenario: Arc<ScenarioConfig>,
        capabilities: Capabilities,
        settings: EngineSettings,
    ) -> Result<Self, TrainingError> {
        let id = SessionId::new();
        let session = TrainingSession::start(id, scenario)?;
        let timeout = settings.capability_timeout;

        info!(session_id = %id, scenario_id = %session.scenario().scenario_id, "Training session started");

        Ok(Self {
            id,
            session: Mutex::new(session),
            evaluator: Evaluator::new(capabilities.scorer, settings.policy, timeout),
            goal_tracker: GoalTracker::new(capabilities.goal_classifier, timeout),
            report_builder: ReportBuilder::new(Arc::clone(&capabilities.counterpart), timeout),
            counterpart: capabilities.counterpart,
            settings,
            created: Instant::now(),
            last_active_ms: AtomicU64::new(0),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    fn touch(&self) {
        let elapsed = u64::try_from(self.created.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.last_active_ms.fetch_max(elapsed, Ordering::Relaxed);
    }

    /// Time since the last operation on this session.
    pub fn idle_for(&self) -> Duration {
        let last = Duration::from_millis(self.last_active_ms.load(Ordering::Relaxed));
        self.created.elapsed().saturating_sub(last)
    }

    /// True while an operation holds the session.
    pub fn is_busy(&self) -> bool {
        self.session.try_lock().is_err()
    }

    fn lock(&self) -> Result<MutexGuard<'_, TrainingSession>, TrainingError> {
        self.session
            .try_lock()
            .map_err(|_| TrainingError::SessionBusy(self.id))
    }

    /// Submits a trainee turn and returns the trainee and counterpart turns.
    ///
    /// # Errors
    ///
    /// - `SessionBusy` if another operation holds the session
    /// - `InvalidState` if the session has ended
    /// - `EmptyInput` if `text` is blank
    /// - `CapabilityUnavailable` if scoring, a goal check or the counterpart
    ///   reply failed; the trainee turn stays pending
    #[instrument(name = "training::submit_turn", skip(self, text), fields(session_id = %self.id))]
    pub async fn submit_turn(&self, text: &str) -> Result<SubmittedTurns, TrainingError> {
        self.touch();
        let mut session = self.lock()?;
        let pending = session.accept_trainee_turn(text)?;
        let scenario = Arc::clone(session.scenario());
        let open_goals = GoalTracker::open_specs(&scenario, session.goals());

        debug!(
            session_id = %self.id,
            turn_id = %pending.turn.id(),
            retry = pending.reused,
            "Trainee turn accepted"
        );

        let staged = tokio::try_join!(
            self.evaluator.evaluate(
                &pending.transcript,
                &pending.turn,
                &scenario.rubric_dimension_labels
            ),
            self.goal_tracker.check(&pending.transcript, &open_goals),
            self.counterpart_reply(&pending.transcript, &scenario),
        );

        let (evaluation, completed_goals, counterpart_text) = staged.map_err(|e| {
            warn!(session_id = %self.id, turn_id = %pending.turn.id(), "Turn capability failed: {}", e);
            TrainingError::from(e)
        })?;

        let submitted = session.commit_turn(
            StagedTurn {
                trainee_turn_id: pending.turn.id(),
                evaluation,
                completed_goals,
                counterpart_text,
            },
            &self.settings.policy,
        )?;

        debug!(
            session_id = %self.id,
            turn_id = %submitted.trainee.id(),
            score = submitted
                .counterpart
                .feedback()
                .map(|f| f.overall_score().value())
                .unwrap_or_default(),
            goals_completed = submitted.completed_goals.len(),
            "Turn committed"
        );
        Ok(submitted)
    }

    async fn counterpart_reply(
        &self,
        transcript: &[Turn],
        scenario: &ScenarioConfig,
    ) -> Result<String, CapabilityError> {
        let text = with_deadline(
            self.settings.capability_timeout,
            self.counterpart.generate_counterpart_turn(transcript, scenario),
        )
        .await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(CapabilityError::invalid_response("empty counterpart reply"));
        }
        Ok(text.to_string())
    }

    /// Ends the session and returns its report.
    ///
    /// Calling again after the session ended returns the cached report.
    ///
    /// # Errors
    ///
    /// - `SessionBusy` if a turn is in flight
    #[instrument(name = "training::end_session", skip(self), fields(session_id = %self.id))]
    pub async fn end_session(&self) -> Result<SessionReport, TrainingError> {
        self.touch();
        let mut session = self.lock()?;
        if let Some(report) = session.report() {
            return Ok(report.clone());
        }

        let scores = session.final_scores();
        let draft = self
            .report_builder
            .build(session.transcript().turns(), scores)
            .await;
        let report = session.close(draft.scores, draft.narrative, draft.source)?;

        info!(
            session_id = %self.id,
            overall_score = report.overall_score.value(),
            passed = report.passed,
            "Training session ended"
        );
        Ok(report)
    }

    /// Discards all progress and restarts the same scenario.
    ///
    /// # Errors
    ///
    /// - `SessionBusy` if a turn is in flight
    #[instrument(name = "training::reset", skip(self), fields(session_id = %self.id))]
    pub async fn reset(&self) -> Result<SessionSnapshot, TrainingError> {
        self.touch();
        let mut session = self.lock()?;
        session.restart()?;
        info!(session_id = %self.id, "Training session reset");
        Ok(session.snapshot())
    }

    #[cfg(test)]
    pub(crate) async fn session_lock_for_test(&self) -> MutexGuard<'_, TrainingSession> {
        self.session.lock().await
    }

    /// Current state. Waits for an in-flight operation to finish.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.touch();
        self.session.lock().await.snapshot()
    }
}
