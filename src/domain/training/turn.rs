//! Turn entity for training transcripts.
//!
//! Turns are immutable records of what the trainee, the simulated
//! counterpart, or the system said. Counterpart turns that answer a scored
//! trainee turn carry the [`Feedback`] for that trainee turn.

use crate::domain::foundation::{Score, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a turn within its transcript.
///
/// Issued by the transcript in strictly increasing order, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(u64);

impl TurnId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the sequence number.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The person being trained.
    Trainee,
    /// The simulated customer or colleague.
    Counterpart,
    /// Scenario briefing and other out-of-character notes.
    System,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sender::Trainee => "Trainee",
            Sender::Counterpart => "Counterpart",
            Sender::System => "System",
        };
        write!(f, "{}", s)
    }
}

/// Coarse classification of a turn score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Evaluation of a single trainee turn.
///
/// # Invariants
///
/// - `overall_score` is within [0, 100]
/// - `tips` is non-empty and holds no blank entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    overall_score: Score,
    sentiment: Sentiment,
    tips: Vec<String>,
}

impl Feedback {
    /// Creates feedback, rejecting an empty tip list.
    pub fn new(
        overall_score: Score,
        sentiment: Sentiment,
        tips: Vec<String>,
    ) -> Result<Self, ValidationError> {
        if tips.is_empty() {
            return Err(ValidationError::empty_field("tips"));
        }
        if tips.iter().any(|tip| tip.trim().is_empty()) {
            return Err(ValidationError::invalid_format("tips", "tips must not be blank"));
        }
        Ok(Self {
            overall_score,
            sentiment,
            tips,
        })
    }

    /// Builds feedback whose tips were already trimmed and backfilled.
    pub(super) fn from_trusted(overall_score: Score, sentiment: Sentiment, tips: Vec<String>) -> Self {
        debug_assert!(!tips.is_empty());
        Self {
            overall_score,
            sentiment,
            tips,
        }
    }

    pub fn overall_score(&self) -> Score {
        self.overall_score
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn tips(&self) -> &[String] {
        &self.tips
    }
}

/// An immutable turn within a transcript.
///
/// # Invariants
///
/// - `id` is unique within the transcript and reflects insertion order
/// - `feedback` is only present on counterpart turns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    id: TurnId,
    sender: Sender,
    text: String,
    created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback: Option<Feedback>,
}

impl Turn {
    pub(crate) fn new(id: TurnId, sender: Sender, text: String, feedback: Option<Feedback>) -> Self {
        Self {
            id,
            sender,
            text,
            created_at: Timestamp::now(),
            feedback,
        }
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Returns true if the trainee wrote this turn.
    pub fn is_trainee(&self) -> bool {
        self.sender == Sender::Trainee
    }
}
