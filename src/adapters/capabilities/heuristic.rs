//! Heuristic turn scorer for offline demo mode.
//!
//! Looks for cue words associated with each rubric area. It is not a judge of
//! quality, just enough signal to make the sidebar move without an LLM.

use async_trait::async_trait;

use crate::domain::training::Turn;
use crate::ports::{CapabilityError, RawTurnScore, TurnScorer};

const BASE_SCORE: f64 = 50.0;
const CUE_BONUS: f64 = 10.0;
const QUESTION_BONUS: f64 = 5.0;
const TERSE_PENALTY: f64 = 15.0;
const RAMBLING_PENALTY: f64 = 10.0;

struct CueFamily {
    /// Substrings of a rubric label that select this family.
    label_hints: &'static [&'static str],
    cues: &'static [&'static str],
    tip: &'static str,
}

const FAMILIES: &[CueFamily] = &[
    CueFamily {
        label_hints: &["logic", "structure"],
        cues: &["because", "first", "so that", "which means", "for example", "result"],
        tip: "Structure your point: claim, evidence, then what it means for them",
    },
    CueFamily {
        label_hints: &["empathy", "rapport"],
        cues: &["understand", "thanks", "thank you", "appreciate", "i hear", "makes sense"],
        tip: "Acknowledge their position before you counter it",
    },
    CueFamily {
        label_hints: &["knowledge", "product"],
        cues: &["integration", "roi", "feature", "onboarding", "security", "support", "days"],
        tip: "Back your claims with a concrete product detail",
    },
    CueFamily {
        label_hints: &["closing", "close"],
        cues: &["next step", "meeting", "schedule", "demo", "trial", "follow up", "sign"],
        tip: "Ask for a concrete next step",
    },
];

/// Cue-word scorer used when no LLM is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    pub fn new() -> Self {
        Self
    }

    fn family_for(label: &str) -> Option<&'static CueFamily> {
        let label = label.to_lowercase();
        FAMILIES
            .iter()
            .find(|family| family.label_hints.iter().any(|hint| label.contains(hint)))
    }

    fn hits(family: &CueFamily, text: &str) -> bool {
        family.cues.iter().any(|cue| text.contains(cue))
    }

    fn score(text: &str, labels: &[String]) -> RawTurnScore {
        let lower = text.to_lowercase();
        let words = text.split_whitespace().count();

        let matched = FAMILIES.iter().filter(|f| Self::hits(f, &lower)).count();
        let mut overall = BASE_SCORE + CUE_BONUS * matched as f64;
        if text.contains('?') {
            overall += QUESTION_BONUS;
        }
        if words < 4 {
            overall -= TERSE_PENALTY;
        } else if words > 80 {
            overall -= RAMBLING_PENALTY;
        }

        let mut raw = RawTurnScore::new(overall);
        for label in labels {
            if let Some(family) = Self::family_for(label) {
                let dimension = if Self::hits(family, &lower) {
                    overall + CUE_BONUS
                } else {
                    overall - CUE_BONUS
                };
                raw = raw.with_dimension(label.clone(), dimension);
            }
        }

        let missed: Vec<&str> = FAMILIES
            .iter()
            .filter(|f| !Self::hits(f, &lower))
            .map(|f| f.tip)
            .take(2)
            .collect();
        if missed.is_empty() {
            raw = raw.with_tip("Well balanced turn, keep that rhythm");
        }
        for tip in missed {
            raw = raw.with_tip(tip);
        }
        raw
    }
}

#[async_trait]
impl TurnScorer for HeuristicScorer {
    async fn score_turn(
        &self,
        _transcript: &[Turn],
        turn: &Turn,
        labels: &[String],
    ) -> Result<RawTurnScore, CapabilityError> {
        Ok(Self::score(turn.text(), labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        ["Logic & Structure", "Empathy & Rapport", "Product Knowledge", "Closing Skills", "Tone"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn cue_words_raise_the_score() {
        let plain = HeuristicScorer::score("We sell software to companies.", &labels());
        let rich = HeuristicScorer::score(
            "I understand, thanks. Because our integration takes days, could we schedule a demo?",
            &labels(),
        );
        assert!(rich.raw_score > plain.raw_score);
    }

    #[test]
    fn terse_turns_are_penalised() {
        let raw = HeuristicScorer::score("Ok.", &labels());
        assert_eq!(raw.raw_score, BASE_SCORE - TERSE_PENALTY);
    }

    #[test]
    fn known_labels_get_dimension_scores() {
        let raw = HeuristicScorer::score("Thanks, I appreciate you making the time today.", &labels());

        let empathy = raw.dimension_scores["Empathy & Rapport"];
        let closing = raw.dimension_scores["Closing Skills"];
        assert!(empathy > closing);
        assert!(!raw.dimension_scores.contains_key("Tone"));
    }

    #[test]
    fn tips_point_at_missing_areas() {
        let raw = HeuristicScorer::score("Let me tell you about us and what we do here.", &labels());
        assert_eq!(raw.tips.len(), 2);
        assert_eq!(raw.tips[0], FAMILIES[0].tip);
    }
}
