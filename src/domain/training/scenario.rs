//! Scenario configuration consumed when a session starts.

use crate::domain::foundation::{GoalId, ScenarioId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Allowed drift of the dimension weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Scenario category shown in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Sales,
    Service,
    Management,
    Product,
}

/// How demanding the counterpart is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// The simulated person the trainee talks to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub job_title: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub personality: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A goal the trainee should reach during the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSpec {
    pub id: GoalId,
    pub description: String,
    /// Phrases that count as reaching the goal for keyword-based checks.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Everything needed to start a session.
///
/// `dimension_weights[i]` weighs `rubric_dimension_labels[i]` in the final
/// overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub scenario_id: ScenarioId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    pub briefing_text: String,
    pub opening_counterpart_text: String,
    pub goals: Vec<GoalSpec>,
    pub rubric_dimension_labels: Vec<String>,
    pub pass_threshold: f64,
    pub dimension_weights: Vec<f64>,
    #[serde(default)]
    pub persona: Option<Persona>,
}

/// Reasons a scenario configuration is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("scenario field '{0}' must not be empty")]
    MissingField(&'static str),

    #[error("scenario must define at least one goal")]
    NoGoals,

    #[error("goal ids must not be blank")]
    BlankGoalId,

    #[error("duplicate goal id '{0}'")]
    DuplicateGoal(GoalId),

    #[error("goal '{0}' has an empty description")]
    EmptyGoalDescription(GoalId),

    #[error("scenario must define at least one rubric dimension")]
    NoDimensions,

    #[error("rubric dimension labels must not be blank")]
    BlankDimensionLabel,

    #[error("duplicate rubric dimension '{0}'")]
    DuplicateDimension(String),

    #[error("expected {labels} dimension weights, got {weights}")]
    WeightCountMismatch { labels: usize, weights: usize },

    #[error("weight for '{label}' must be finite and non-negative, got {weight}")]
    InvalidWeight { label: String, weight: f64 },

    #[error("dimension weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("pass threshold must be between 0 and 100, got {0}")]
    PassThresholdOutOfRange(f64),
}

impl ScenarioConfig {
    /// Checks every structural rule a session relies on.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.scenario_id.as_str().trim().is_empty() {
            return Err(ScenarioError::MissingField("scenario_id"));
        }
        if self.title.trim().is_empty() {
            return Err(ScenarioError::MissingField("title"));
        }
        if self.briefing_text.trim().is_empty() {
            return Err(ScenarioError::MissingField("briefing_text"));
        }
        if self.opening_counterpart_text.trim().is_empty() {
            return Err(ScenarioError::MissingField("opening_counterpart_text"));
        }

        self.validate_goals()?;
        self.validate_dimensions()?;

        if !self.pass_threshold.is_finite() || !(0.0..=100.0).contains(&self.pass_threshold) {
            return Err(ScenarioError::PassThresholdOutOfRange(self.pass_threshold));
        }
        Ok(())
    }

    fn validate_goals(&self) -> Result<(), ScenarioError> {
        if self.goals.is_empty() {
            return Err(ScenarioError::NoGoals);
        }
        let mut seen = HashSet::new();
        for goal in &self.goals {
            if goal.id.as_str().trim().is_empty() {
                return Err(ScenarioError::BlankGoalId);
            }
            if !seen.insert(&goal.id) {
                return Err(ScenarioError::DuplicateGoal(goal.id.clone()));
            }
            if goal.description.trim().is_empty() {
                return Err(ScenarioError::EmptyGoalDescription(goal.id.clone()));
            }
        }
        Ok(())
    }

    fn validate_dimensions(&self) -> Result<(), ScenarioError> {
        if self.rubric_dimension_labels.is_empty() {
            return Err(ScenarioError::NoDimensions);
        }
        let mut seen = HashSet::new();
        for label in &self.rubric_dimension_labels {
            if label.trim().is_empty() {
                return Err(ScenarioError::BlankDimensionLabel);
            }
            if !seen.insert(label.as_str()) {
                return Err(ScenarioError::DuplicateDimension(label.clone()));
            }
        }

        if self.dimension_weights.len() != self.rubric_dimension_labels.len() {
            return Err(ScenarioError::WeightCountMismatch {
                labels: self.rubric_dimension_labels.len(),
                weights: self.dimension_weights.len(),
            });
        }
        for (label, &weight) in self.rubric_dimension_labels.iter().zip(&self.dimension_weights) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScenarioError::InvalidWeight {
                    label: label.clone(),
                    weight,
                });
            }
        }
        let sum: f64 = self.dimension_weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScenarioError::WeightSum(sum));
        }
        Ok(())
    }

    /// Returns the catalog listing for this scenario.
    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            scenario_id: self.scenario_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            difficulty: self.difficulty,
            goal_count: self.goals.len(),
            counterpart: self.persona.as_ref().map(|p| format!("{}, {}", p.name, p.job_title)),
        }
    }
}

/// Catalog listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub scenario_id: ScenarioId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub goal_count: usize,
    pub counterpart: Option<String>,
}


#[cfg(test)]
mod tests {
    use super::test_support::sales_scenario;
    use super::*;

    #[test]
    fn valid_scenario_passes() {
        assert_eq!(sales_scenario().validate(), Ok(()));
    }

    #[test]
    fn blank_briefing_is_rejected() {
        let mut scenario = sales_scenario();
        scenario.briefing_text = "  ".to_string();
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::MissingField("briefing_text"))
        );
    }

    #[test]
    fn no_goals_is_rejected() {
        let mut scenario = sales_scenario();
        scenario.goals.clear();
        assert_eq!(scenario.validate(), Err(ScenarioError::NoGoals));
    }

    #[test]
    fn duplicate_goal_is_rejected() {
        let mut scenario = sales_scenario();
        let dup = scenario.goals[0].clone();
        scenario.goals.push(dup);
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioError::DuplicateGoal(id)) if id.as_str() == "rapport"
        ));
    }

    #[test]
    fn duplicate_dimension_is_rejected() {
        let mut scenario = sales_scenario();
        scenario.rubric_dimension_labels[3] = "Logic".to_string();
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::DuplicateDimension("Logic".to_string()))
        );
    }

    #[test]
    fn weight_count_must_match_labels() {
        let mut scenario = sales_scenario();
        scenario.dimension_weights.pop();
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::WeightCountMismatch { labels: 4, weights: 3 })
        );
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut scenario = sales_scenario();
        scenario.dimension_weights = vec![0.5, 0.5, 0.5, -0.5];
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let mut scenario = sales_scenario();
        scenario.dimension_weights = vec![0.3, 0.3, 0.3, 0.3];
        assert!(matches!(scenario.validate(), Err(ScenarioError::WeightSum(_))));
    }

    #[test]
    fn weight_sum_tolerates_float_drift() {
        let mut scenario = sales_scenario();
        scenario.dimension_weights = vec![0.1, 0.2, 0.3, 0.4];
        assert_eq!(scenario.validate(), Ok(()));
    }

    #[test]
    fn pass_threshold_must_be_in_range() {
        let mut scenario = sales_scenario();
        scenario.pass_threshold = 101.0;
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::PassThresholdOutOfRange(101.0))
        );
    }

    #[test]
    fn summary_describes_persona() {
        let mut scenario = sales_scenario();
        scenario.persona = Some(Persona {
            name: "Sarah Lin".to_string(),
            job_title: "Purchasing Manager".to_string(),
            age: Some(32),
            personality: vec!["Analytical".to_string()],
            description: None,
        });
        let summary = scenario.summary();
        assert_eq!(summary.counterpart.as_deref(), Some("Sarah Lin, Purchasing Manager"));
        assert_eq!(summary.goal_count, 2);
    }
}
