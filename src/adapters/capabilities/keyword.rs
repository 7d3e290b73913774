//! Keyword goal classifier.

use async_trait::async_trait;

use crate::domain::training::{GoalSpec, Turn};
use crate::ports::{CapabilityError, GoalClassifier};

/// Marks a goal satisfied once any trainee turn mentions one of its keywords.
///
/// Matching is case-insensitive substring search. Goals without keywords are
/// never satisfied by this classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordGoalClassifier;

impl KeywordGoalClassifier {
    fn matches(text: &str, goal: &GoalSpec) -> bool {
        let text = text.to_lowercase();
        goal.keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .any(|k| text.contains(&k))
    }
}

#[async_trait]
impl GoalClassifier for KeywordGoalClassifier {
    async fn is_satisfied(
        &self,
        transcript: &[Turn],
        goal: &GoalSpec,
    ) -> Result<bool, CapabilityError> {
        Ok(transcript
            .iter()
            .filter(|turn| turn.is_trainee())
            .any(|turn| Self::matches(turn.text(), goal)))
    }
}
