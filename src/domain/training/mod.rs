//! Training domain - roleplay sessions, scoring and reports.
//!
//! A [`TrainingSession`] owns the transcript, goal checklist and rubric for
//! one trainee working through one scenario.

mod errors;
mod goals;
mod report;
mod rubric;
mod scenario;
mod scoring;
mod session;
mod transcript;
mod turn;

pub use errors::TrainingError;
pub use goals::{Goal, GoalChecklist};
pub use report::{NarrativeSource, ReportScores, SessionReport};
pub use rubric::{Rubric, RubricDimension};
pub use scenario::{
    Category, Difficulty, GoalSpec, Persona, ScenarioConfig, ScenarioError, ScenarioSummary,
    WEIGHT_SUM_TOLERANCE,
};
pub use scoring::{
    Evaluation, ScoringPolicy, DEFAULT_NEUTRAL_MIN, DEFAULT_POSITIVE_MIN, DEFAULT_ROLLUP_WEIGHT,
};
pub use session::{PendingTurn, SessionSnapshot, StagedTurn, SubmittedTurns, TrainingSession};
pub use transcript::Transcript;
pub use turn::{Feedback, Sender, Sentiment, Turn, TurnId};

#[cfg(test)]
pub(crate) use scenario::test_support;
