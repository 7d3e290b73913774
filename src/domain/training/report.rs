//! End-of-session report.
//!
//! The numeric part of the report ([`ReportScores`]) is a pure function of
//! the scenario weights, the final rubric and the goal checklist. The
//! narrative is produced separately and may come from a canned template.

use super::goals::{Goal, GoalChecklist};
use super::rubric::{Rubric, RubricDimension};
use super::scenario::ScenarioConfig;
use crate::domain::foundation::{ScenarioId, Score, SessionId, Timestamp};
use serde::{Deserialize, Serialize};

/// Where the narrative feedback came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    /// Written by the generation capability.
    Generated,
    /// Canned template used because generation failed or timed out.
    Fallback,
}

/// Final numbers for a session, before narrative synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportScores {
    pub overall_score: Score,
    pub dimensions: Vec<RubricDimension>,
    pub passed: bool,
    pub pass_threshold: f64,
    pub goals: Vec<Goal>,
    pub trainee_turns: u32,
}

impl ReportScores {
    /// Weighted sum of the final dimension scores and the pass decision.
    pub fn aggregate(scenario: &ScenarioConfig, rubric: &Rubric, goals: &GoalChecklist) -> Self {
        let weighted: f64 = rubric
            .dimensions()
            .iter()
            .zip(&scenario.dimension_weights)
            .map(|(dimension, weight)| dimension.score.value() * weight)
            .sum();
        let overall_score = Score::new(weighted);

        Self {
            overall_score,
            dimensions: rubric.dimensions().to_vec(),
            passed: overall_score.value() >= scenario.pass_threshold,
            pass_threshold: scenario.pass_threshold,
            goals: goals.goals().to_vec(),
            trainee_turns: rubric.scored_turns(),
        }
    }

    pub fn goals_completed(&self) -> usize {
        self.goals.iter().filter(|goal| goal.is_done()).count()
    }

    /// Canned narrative used when the generation capability is unavailable.
    pub fn fallback_narrative(&self) -> String {
        let verdict = if self.passed {
            "You passed this scenario"
        } else {
            "You did not reach the pass mark this time"
        };
        let mut narrative = format!(
            "{} with an overall score of {}/100 (pass mark {}).",
            verdict,
            self.overall_score,
            self.pass_threshold.round()
        );

        let strongest = self
            .dimensions
            .iter()
            .max_by(|a, b| a.score.value().total_cmp(&b.score.value()));
        let weakest = self
            .dimensions
            .iter()
            .min_by(|a, b| a.score.value().total_cmp(&b.score.value()));
        if let (Some(strong), Some(weak)) = (strongest, weakest) {
            if self.trainee_turns > 0 && strong.label != weak.label {
                narrative.push_str(&format!(
                    " Strongest area: {} ({}). Focus next on {} ({}).",
                    strong.label, strong.score, weak.label, weak.score
                ));
            }
        }

        narrative.push_str(&format!(
            " Goals completed: {} of {}.",
            self.goals_completed(),
            self.goals.len()
        ));
        narrative
    }
}

/// Immutable report produced once when a session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub scenario_id: ScenarioId,
    pub overall_score: Score,
    pub dimensions: Vec<RubricDimension>,
    pub passed: bool,
    pub narrative_feedback: String,
    pub narrative_source: NarrativeSource,
    pub goals: Vec<Goal>,
    pub trainee_turns: u32,
    pub generated_at: Timestamp,
}

impl SessionReport {
    pub fn new(
        session_id: SessionId,
        scenario_id: ScenarioId,
        scores: ReportScores,
        narrative_feedback: String,
        narrative_source: NarrativeSource,
    ) -> Self {
        Self {
            session_id,
            scenario_id,
            overall_score: scores.overall_score,
            dimensions: scores.dimensions,
            passed: scores.passed,
            narrative_feedback,
            narrative_source,
            goals: scores.goals,
            trainee_turns: scores.trainee_turns,
            generated_at: Timestamp::now(),
        }
    }
}
