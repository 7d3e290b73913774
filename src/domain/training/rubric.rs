//! Rubric dimensions and their running scores.

use super::scoring::{Evaluation, ScoringPolicy};
use crate::domain::foundation::Score;
use serde::{Deserialize, Serialize};

/// One scored skill area (e.g. "Empathy & Rapport").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricDimension {
    pub label: String,
    pub score: Score,
}

/// Running rubric values for a session.
///
/// Dimensions start at zero and are seeded by the first scored trainee turn.
/// Later turns are blended in with the policy's rollup weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Rubric {
    dimensions: Vec<RubricDimension>,
    scored_turns: u32,
}

impl Rubric {
    /// Creates a rubric with one zeroed dimension per label.
    pub fn new(labels: &[String]) -> Self {
        Self {
            dimensions: labels
                .iter()
                .map(|label| RubricDimension {
                    label: label.clone(),
                    score: Score::ZERO,
                })
                .collect(),
            scored_turns: 0,
        }
    }

    /// Folds one evaluated trainee turn into every dimension.
    pub fn fold(&mut self, evaluation: &Evaluation, policy: &ScoringPolicy) {
        let seeded = self.scored_turns > 0;
        for dimension in &mut self.dimensions {
            let previous = seeded.then_some(dimension.score);
            dimension.score = policy.rollup(previous, evaluation.turn_score_for(&dimension.label));
        }
        self.scored_turns += 1;
    }

    pub fn dimensions(&self) -> &[RubricDimension] {
        &self.dimensions
    }

    /// Number of trainee turns folded in so far.
    pub fn scored_turns(&self) -> u32 {
        self.scored_turns
    }

    pub fn score_of(&self, label: &str) -> Option<Score> {
        self.dimensions
            .iter()
            .find(|d| d.label == label)
            .map(|d| d.score)
    }
}
