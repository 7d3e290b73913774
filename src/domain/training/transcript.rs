//! Append-only transcript of a training session.

use super::turn::{Feedback, Sender, Turn, TurnId};
use serde::{Deserialize, Serialize};

/// Ordered log of turns.
///
/// Turns are only ever appended; nothing is edited or removed. Insertion
/// order is the only ordering guarantee and matches `TurnId` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a system turn (briefing or out-of-character note).
    pub fn append_system(&mut self, text: impl Into<String>) -> &Turn {
        self.push(Sender::System, text.into(), None)
    }

    /// Appends a trainee turn.
    pub fn append_trainee(&mut self, text: impl Into<String>) -> &Turn {
        self.push(Sender::Trainee, text.into(), None)
    }

    /// Appends a counterpart turn, optionally carrying feedback for the
    /// trainee turn it answers.
    pub fn append_counterpart(
        &mut self,
        text: impl Into<String>,
        feedback: Option<Feedback>,
    ) -> &Turn {
        self.push(Sender::Counterpart, text.into(), feedback)
    }

    fn push(&mut self, sender: Sender, text: String, feedback: Option<Feedback>) -> &Turn {
        let id = TurnId::new(self.next_id);
        self.next_id += 1;
        self.turns.push(Turn::new(id, sender, text, feedback));
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Returns all turns up to and including `id`.
    ///
    /// Returns an empty slice if the id is unknown.
    pub fn prefix_through(&self, id: TurnId) -> &[Turn] {
        match self.turns.iter().position(|turn| turn.id() == id) {
            Some(index) => &self.turns[..=index],
            None => &[],
        }
    }

    /// Returns the trailing trainee turn if no counterpart has answered it yet.
    pub fn pending_trainee_turn(&self) -> Option<&Turn> {
        self.last().filter(|turn| turn.is_trainee())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Score;
    use crate::domain::training::turn::Sentiment;

    fn feedback() -> Feedback {
        Feedback::new(Score::new(55.0), Sentiment::Neutral, vec!["Tip".to_string()]).unwrap()
    }

    #[test]
    fn ids_increase_with_each_append() {
        let mut transcript = Transcript::new();
        let a = transcript.append_system("Brief").id();
        let b = transcript.append_counterpart("Hi", None).id();
        let c = transcript.append_trainee("Hello").id();

        assert!(a < b && b < c);
        assert_eq!(c.value(), 2);
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn counterpart_turn_keeps_feedback() {
        let mut transcript = Transcript::new();
        transcript.append_trainee("Hello");
        let turn = transcript.append_counterpart("Reply", Some(feedback()));

        assert_eq!(turn.sender(), Sender::Counterpart);
        assert_eq!(turn.feedback().unwrap().sentiment(), Sentiment::Neutral);
    }

    #[test]
    fn prefix_through_includes_target_turn() {
        let mut transcript = Transcript::new();
        transcript.append_system("Brief");
        let target = transcript.append_trainee("Hello").id();
        transcript.append_counterpart("Reply", None);

        let prefix = transcript.prefix_through(target);
        assert_eq!(prefix.len(), 2);
        assert_eq!(prefix[1].id(), target);
    }

    #[test]
    fn prefix_through_unknown_id_is_empty() {
        let mut transcript = Transcript::new();
        transcript.append_system("Brief");
        assert!(transcript.prefix_through(TurnId::new(42)).is_empty());
    }

    #[test]
    fn pending_trainee_turn_only_when_last_is_trainee() {
        let mut transcript = Transcript::new();
        transcript.append_counterpart("Hi", None);
        assert!(transcript.pending_trainee_turn().is_none());

        transcript.append_trainee("Hello");
        assert_eq!(transcript.pending_trainee_turn().unwrap().text(), "Hello");

        transcript.append_counterpart("Reply", Some(feedback()));
        assert!(transcript.pending_trainee_turn().is_none());
    }
}
