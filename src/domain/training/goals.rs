//! Goal checklist with monotonic completion.

use super::scenario::GoalSpec;
use crate::domain::foundation::GoalId;
use serde::{Deserialize, Serialize};

/// A session objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    id: GoalId,
    description: String,
    done: bool,
}

impl Goal {
    pub fn id(&self) -> &GoalId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// The fixed set of goals for one session.
///
/// # Invariants
///
/// - the goal set never changes after creation
/// - `done` only ever flips from false to true
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalChecklist {
    goals: Vec<Goal>,
}

impl GoalChecklist {
    pub fn from_specs(specs: &[GoalSpec]) -> Self {
        Self {
            goals: specs
                .iter()
                .map(|spec| Goal {
                    id: spec.id.clone(),
                    description: spec.description.clone(),
                    done: false,
                })
                .collect(),
        }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Goals not yet completed, in checklist order.
    pub fn open_goals(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(|goal| !goal.done)
    }

    /// Marks a goal done. Returns true only if this call flipped it.
    ///
    /// Unknown ids are ignored.
    pub fn mark_done(&mut self, id: &GoalId) -> bool {
        match self.goals.iter_mut().find(|goal| &goal.id == id) {
            Some(goal) if !goal.done => {
                goal.done = true;
                true
            }
            _ => false,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.goals.iter().filter(|goal| goal.done).count()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checklist() -> GoalChecklist {
        GoalChecklist::from_specs(&[
            GoalSpec {
                id: GoalId::new("rapport").unwrap(),
                description: "Establish rapport".to_string(),
                keywords: vec![],
            },
            GoalSpec {
                id: GoalId::new("budget").unwrap(),
                description: "Uncover budget concerns".to_string(),
                keywords: vec![],
            },
        ])
    }

    #[test]
    fn starts_with_all_goals_open() {
        let goals = checklist();
        assert_eq!(goals.open_goals().count(), 2);
        assert_eq!(goals.completed_count(), 0);
    }

    #[test]
    fn mark_done_flips_once() {
        let mut goals = checklist();
        let id = GoalId::new("budget").unwrap();

        assert!(goals.mark_done(&id));
        assert!(!goals.mark_done(&id));
        assert_eq!(goals.completed_count(), 1);
        assert_eq!(goals.open_goals().next().unwrap().id().as_str(), "rapport");
    }

    #[test]
    fn mark_done_ignores_unknown_goal() {
        let mut goals = checklist();
        assert!(!goals.mark_done(&GoalId::new("close").unwrap()));
        assert_eq!(goals.len(), 2);
    }
}
