//! Scripted capabilities for tests and offline demos.
//!
//! Outputs are queued up front and consumed in order. When a queue runs dry
//! the counterpart cycles canned demo lines and the scorer uses its default
//! score, if one was configured.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::sleep;

use crate::domain::training::{ReportScores, ScenarioConfig, Turn};
use crate::ports::{CapabilityError, CounterpartGenerator, RawTurnScore, TurnScorer};

const DEMO_LINES: &[&str] = &[
    "That's an interesting point. Our current vendor does take weeks to turn changes around.",
    "Okay, but how would that actually work for a team our size?",
    "I'd need to run any numbers past finance. What are we talking about here?",
    "Fair enough. If I were interested, what would the next step look like?",
];

// ───────────────────────────────────────────────────────────────────────────────
// ScriptedScorer
// ───────────────────────────────────────────────────────────────────────────────

/// Turn scorer that replays queued scores and errors.
#[derive(Default)]
pub struct ScriptedScorer {
    queue: Mutex<VecDeque<Result<RawTurnScore, CapabilityError>>>,
    default: Option<RawTurnScore>,
    delay: Duration,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl ScriptedScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a score for the next call.
    pub fn with_score(self, score: RawTurnScore) -> Self {
        self.queue.lock().unwrap().push_back(Ok(score));
        self
    }

    /// Queues a failure for the next call.
    pub fn with_error(self, error: CapabilityError) -> Self {
        self.queue.lock().unwrap().push_back(Err(error));
        self
    }

    /// Score returned once the queue is empty.
    pub fn with_default(mut self, score: RawTurnScore) -> Self {
        self.default = Some(score);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Holds every call until `gate` is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TurnScorer for ScriptedScorer {
    async fn score_turn(
        &self,
        _transcript: &[Turn],
        _turn: &Turn,
        _labels: &[String],
    ) -> Result<RawTurnScore, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let queued = self.queue.lock().unwrap().pop_front();
        match queued {
            Some(result) => result,
            None => self
                .default
                .clone()
                .ok_or_else(|| CapabilityError::unavailable("scripted scorer exhausted")),
        }
    }
}

// ───────────────────────────────────────────────────────────────────────────────
// ScriptedCounterpart
// ───────────────────────────────────────────────────────────────────────────────

/// Counterpart generator that replays queued replies.
#[derive(Default)]
pub struct ScriptedCounterpart {
    replies: Mutex<VecDeque<Result<String, CapabilityError>>>,
    narrative: Option<Result<String, CapabilityError>>,
    delay: Duration,
    demo_cursor: AtomicUsize,
}

impl ScriptedCounterpart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn with_error(self, error: CapabilityError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_narrative(mut self, text: impl Into<String>) -> Self {
        self.narrative = Some(Ok(text.into()));
        self
    }

    pub fn with_narrative_error(mut self, error: CapabilityError) -> Self {
        self.narrative = Some(Err(error));
        self
    }

    /// Delay applied to replies and narratives alike.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn demo_line(&self) -> String {
        let i = self.demo_cursor.fetch_add(1, Ordering::SeqCst);
        DEMO_LINES[i % DEMO_LINES.len()].to_string()
    }

    fn summary(scores: &ReportScores) -> String {
        let verdict = if scores.passed { "Well done" } else { "Keep practising" };
        format!(
            "{}: {} of {} goals reached over {} turns, finishing on {}/100.",
            verdict,
            scores.goals_completed(),
            scores.goals.len(),
            scores.trainee_turns,
            scores.overall_score
        )
    }
}

#[async_trait]
impl CounterpartGenerator for ScriptedCounterpart {
    async fn generate_counterpart_turn(
        &self,
        _transcript: &[Turn],
        _scenario: &ScenarioConfig,
    ) -> Result<String, CapabilityError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        let queued = self.replies.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| Ok(self.demo_line()))
    }

    async fn generate_narrative(
        &self,
        _transcript: &[Turn],
        scores: &ReportScores,
    ) -> Result<String, CapabilityError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.narrative
            .clone()
            .unwrap_or_else(|| Ok(Self::summary(scores)))
    }
}
