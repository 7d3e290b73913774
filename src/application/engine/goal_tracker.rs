//! GoalTracker - checks open goals against the transcript.

use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;

use super::with_deadline;
use crate::domain::foundation::GoalId;
use crate::domain::training::{GoalChecklist, GoalSpec, ScenarioConfig, Turn};
use crate::ports::{CapabilityError, GoalClassifier};

/// Asks the goal classifier about every open goal, once per trainee turn.
pub struct GoalTracker {
    classifier: Arc<dyn GoalClassifier>,
    timeout: Duration,
}

impl GoalTracker {
    pub fn new(classifier: Arc<dyn GoalClassifier>, timeout: Duration) -> Self {
        Self {
            classifier,
            timeout,
        }
    }

    /// Scenario goal specs that are still open in `checklist`.
    pub fn open_specs(scenario: &ScenarioConfig, checklist: &GoalChecklist) -> Vec<GoalSpec> {
        scenario
            .goals
            .iter()
            .filter(|spec| checklist.open_goals().any(|goal| goal.id() == &spec.id))
            .cloned()
            .collect()
    }

    /// Returns the ids of `open` goals the transcript now satisfies.
    ///
    /// Any single failure fails the whole check so nothing is half applied.
    pub async fn check(
        &self,
        transcript: &[Turn],
        open: &[GoalSpec],
    ) -> Result<Vec<GoalId>, CapabilityError> {
        let checks = open.iter().map(|goal| async move {
            let satisfied =
                with_deadline(self.timeout, self.classifier.is_satisfied(transcript, goal)).await?;
            Ok::<_, CapabilityError>(satisfied.then(|| goal.id.clone()))
        });

        let completed: Vec<GoalId> = try_join_all(checks).await?.into_iter().flatten().collect();
        if !completed.is_empty() {
            tracing::debug!(completed = completed.len(), "goals satisfied");
        }
        Ok(completed)
    }
}
