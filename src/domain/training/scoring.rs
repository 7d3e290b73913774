//! Scoring policy: clamping, sentiment bands and rubric rollup.

use super::turn::{Feedback, Sentiment};
use crate::domain::foundation::{Score, ValidationError};
use std::collections::BTreeMap;

/// Default lower bound of the positive sentiment band.
pub const DEFAULT_POSITIVE_MIN: f64 = 70.0;

/// Default lower bound of the neutral sentiment band.
pub const DEFAULT_NEUTRAL_MIN: f64 = 40.0;

/// Default weight of the newest turn in the rubric rollup.
pub const DEFAULT_ROLLUP_WEIGHT: f64 = 0.3;

/// Tunable thresholds used when interpreting raw turn scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    positive_min: f64,
    neutral_min: f64,
    rollup_weight: f64,
}

impl ScoringPolicy {
    /// Creates a policy.
    ///
    /// Requires `0 <= neutral_min <= positive_min <= 100` and
    /// `0 < rollup_weight <= 1`.
    pub fn new(
        positive_min: f64,
        neutral_min: f64,
        rollup_weight: f64,
    ) -> Result<Self, ValidationError> {
        if !(0.0..=100.0).contains(&positive_min) {
            return Err(ValidationError::out_of_range("positive_min", 0.0, 100.0, positive_min));
        }
        if !(0.0..=positive_min).contains(&neutral_min) {
            return Err(ValidationError::out_of_range(
                "neutral_min",
                0.0,
                positive_min,
                neutral_min,
            ));
        }
        if !(rollup_weight > 0.0 && rollup_weight <= 1.0) {
            return Err(ValidationError::out_of_range("rollup_weight", 0.0, 1.0, rollup_weight));
        }
        Ok(Self {
            positive_min,
            neutral_min,
            rollup_weight,
        })
    }

    pub fn rollup_weight(&self) -> f64 {
        self.rollup_weight
    }

    /// Maps a score onto a sentiment band.
    pub fn classify(&self, score: Score) -> Sentiment {
        let value = score.value();
        if value >= self.positive_min {
            Sentiment::Positive
        } else if value >= self.neutral_min {
            Sentiment::Neutral
        } else {
            Sentiment::Negative
        }
    }

    /// Blends a new turn score into a running dimension value.
    ///
    /// `None` means the dimension has not been scored yet, so the turn
    /// score seeds it.
    pub fn rollup(&self, previous: Option<Score>, turn_score: Score) -> Score {
        match previous {
            None => turn_score,
            Some(old) => Score::new(
                (1.0 - self.rollup_weight) * old.value() + self.rollup_weight * turn_score.value(),
            ),
        }
    }

    /// Turns raw capability output into validated feedback plus
    /// per-dimension turn scores.
    ///
    /// Dimension scores for labels outside `labels` are dropped. An empty
    /// tip list is replaced with a canned tip for the sentiment band.
    pub fn interpret(
        &self,
        raw_score: f64,
        tips: Vec<String>,
        dimension_scores: BTreeMap<String, f64>,
        labels: &[String],
    ) -> Evaluation {
        let overall = Score::new(raw_score);
        let sentiment = self.classify(overall);

        let mut tips: Vec<String> = tips
            .into_iter()
            .map(|tip| tip.trim().to_string())
            .filter(|tip| !tip.is_empty())
            .collect();
        if tips.is_empty() {
            tips.push(canned_tip(sentiment).to_string());
        }

        let dimension_scores = dimension_scores
            .into_iter()
            .filter(|(label, _)| labels.contains(label))
            .map(|(label, raw)| (label, Score::new(raw)))
            .collect();

        Evaluation {
            feedback: Feedback::from_trusted(overall, sentiment, tips),
            dimension_scores,
        }
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            positive_min: DEFAULT_POSITIVE_MIN,
            neutral_min: DEFAULT_NEUTRAL_MIN,
            rollup_weight: DEFAULT_ROLLUP_WEIGHT,
        }
    }
}

fn canned_tip(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "Keep building on what worked in that turn.",
        Sentiment::Neutral => "Tie your next point more directly to the customer's stated needs.",
        Sentiment::Negative => {
            "Slow down and ask an open question to understand the customer's position."
        }
    }
}

/// Outcome of evaluating one trainee turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub feedback: Feedback,
    /// Per-dimension turn scores reported by the scorer, keyed by label.
    pub dimension_scores: BTreeMap<String, Score>,
}

impl Evaluation {
    /// Score that feeds the rollup for `label`.
    ///
    /// Falls back to the overall turn score when the scorer did not rate the
    /// dimension separately.
    pub fn turn_score_for(&self, label: &str) -> Score {
        self.dimension_scores
            .get(label)
            .copied()
            .unwrap_or_else(|| self.feedback.overall_score())
    }
}
